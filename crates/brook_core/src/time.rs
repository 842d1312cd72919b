//! Fixed timestep clock
//!
//! Physics runs at a fixed tick rate; the host feeds in wall-clock frame
//! deltas and runs however many ticks have accumulated.

use std::time::Duration;

/// Default physics tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Upper bound on ticks run for a single frame. A long stall drops the
/// remaining backlog instead of trying to catch up.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Accumulator that converts frame time into whole physics ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    tick_count: u64,
    max_ticks_per_frame: u32,
}

impl FixedTimestep {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            tick_count: 0,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
        }
    }

    /// Out-of-range or non-finite input yields a zero step, which never ticks.
    pub fn from_seconds(seconds: f32) -> Self {
        Self::new(Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO))
    }

    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Step length in seconds, as consumed by the solver.
    pub fn dt(&self) -> f32 {
        self.step.as_secs_f32()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated time covered by all ticks so far.
    pub fn total_time(&self) -> Duration {
        u32::try_from(self.tick_count)
            .ok()
            .and_then(|ticks| self.step.checked_mul(ticks))
            .unwrap_or_else(|| {
                Duration::try_from_secs_f64(self.step.as_secs_f64() * self.tick_count as f64)
                    .unwrap_or(Duration::MAX)
            })
    }

    /// Feed one frame of wall time and return the number of ticks to run now.
    pub fn advance(&mut self, frame_delta: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }

        self.accumulator += frame_delta;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_ticks_per_frame && self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        if self.step.is_zero() {
            return 0.0;
        }
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    /// Drop any banked time, e.g. when resuming from pause.
    pub fn discard_backlog(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = FixedTimestep::new(Duration::from_millis(10));
        assert_eq!(clock.advance(Duration::from_millis(6)), 0);
        assert_eq!(clock.advance(Duration::from_millis(6)), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-4);
        assert_eq!(clock.tick_count(), 1);
    }

    #[test]
    fn caps_ticks_and_drops_backlog() {
        let mut clock = FixedTimestep::new(Duration::from_millis(10)).with_max_ticks_per_frame(3);
        assert_eq!(clock.advance(Duration::from_millis(100)), 3);
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.total_time(), Duration::from_millis(30));
    }

    #[test]
    fn unrepresentable_seconds_give_idle_clock() {
        for seconds in [1e20, -1.0, f32::NAN] {
            let mut clock = FixedTimestep::from_seconds(seconds);
            assert!(clock.step().is_zero());
            assert_eq!(clock.advance(Duration::from_secs(1)), 0);
        }
    }

    #[test]
    fn total_time_survives_tick_counts_past_u32() {
        let mut clock = FixedTimestep::new(Duration::from_millis(10));
        clock.tick_count = u32::MAX as u64 + 10;
        let expected = Duration::from_millis(10).as_secs_f64() * clock.tick_count as f64;
        assert!((clock.total_time().as_secs_f64() - expected).abs() < 1e-3);
    }

    #[test]
    fn zero_step_never_ticks() {
        let mut clock = FixedTimestep::new(Duration::ZERO);
        assert_eq!(clock.advance(Duration::from_secs(1)), 0);
    }
}
