//! Per-stage wall-clock timings for the solver pipeline

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

/// Rolling timings keyed by stage name, reported in first-seen order.
#[derive(Debug, Clone)]
pub struct StageProfiler {
    window: usize,
    stages: Vec<(&'static str, RingBuffer<Duration>)>,
}

impl StageProfiler {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            stages: Vec::new(),
        }
    }

    pub fn time<F, R>(&mut self, stage: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record(stage, start.elapsed());
        result
    }

    pub fn record(&mut self, stage: &'static str, elapsed: Duration) {
        match self.stages.iter_mut().find(|(name, _)| *name == stage) {
            Some((_, history)) => history.push(elapsed),
            None => {
                let mut history = RingBuffer::new(self.window);
                history.push(elapsed);
                self.stages.push((stage, history));
            }
        }
    }

    pub fn last(&self, stage: &str) -> Duration {
        self.history(stage)
            .and_then(RingBuffer::latest)
            .unwrap_or_default()
    }

    pub fn average(&self, stage: &str) -> Duration {
        self.history(stage)
            .map(RingBuffer::average)
            .unwrap_or_default()
    }

    /// Average timing per stage.
    pub fn stages(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.stages
            .iter()
            .map(|(name, history)| (*name, history.average()))
    }

    pub fn reset(&mut self) {
        self.stages.clear();
    }

    fn history(&self, stage: &str) -> Option<&RingBuffer<Duration>> {
        self.stages
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, history)| history)
    }
}

impl Default for StageProfiler {
    fn default() -> Self {
        Self::new(60)
    }
}
