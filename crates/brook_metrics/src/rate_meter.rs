//! Event rate over a sliding measurement window

use std::time::Duration;

/// Counts events (frames, ticks) and publishes a rate once per window.
///
/// The published rate only changes when a full window has elapsed, which keeps
/// an on-screen counter readable.
#[derive(Debug, Clone)]
pub struct RateMeter {
    window: Duration,
    count: u32,
    elapsed: Duration,
    rate: f64,
}

impl RateMeter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            count: 0,
            elapsed: Duration::ZERO,
            rate: 0.0,
        }
    }

    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Record one event that took `delta` of wall time.
    pub fn tick(&mut self, delta: Duration) {
        self.count += 1;
        self.elapsed += delta;

        if self.elapsed >= self.window {
            self.rate = self.count as f64 / self.elapsed.as_secs_f64();
            self.count = 0;
            self.elapsed = Duration::ZERO;
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Default for RateMeter {
    fn default() -> Self {
        Self::per_second()
    }
}
