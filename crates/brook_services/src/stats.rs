//! Telemetry shown next to the fluid: frame rate, particle counts, stage costs

use brook_core::{FluidSimulation, StepStats};
use brook_metrics::RateMeter;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct PerformanceStats {
    fps: RateMeter,
    pub active_particles: usize,
    pub max_particles: usize,
    pub ticks_last_frame: u32,
    pub last_step: StepStats,
    pub stage_timings: Vec<(&'static str, Duration)>,
}

impl PerformanceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rendered frame.
    pub fn frame(&mut self, delta: Duration, ticks: u32, sim: &FluidSimulation) {
        self.fps.tick(delta);
        self.ticks_last_frame = ticks;
        self.active_particles = sim.active_count();
        self.max_particles = sim.max_particles();
        // Timings only move when a step ran.
        if ticks > 0 || self.stage_timings.is_empty() {
            self.stage_timings = sim.stage_timings();
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps.rate()
    }
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FPS: {:.1} | Active Particles: {} / {}",
            self.fps(),
            self.active_particles,
            self.max_particles
        )
    }
}
