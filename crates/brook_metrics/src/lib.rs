//! Brook Metrics - instrumentation for the fluid solver and its host loop
//!
//! Everything here compiles to zero-sized no-op stubs unless the `metrics`
//! feature is enabled, so release builds of the solver carry no timing code.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use brook_metrics::{RateMeter, StageProfiler};
//!
//! let mut profiler = StageProfiler::new(120);
//! let density = profiler.time("density", || compute_density());
//! metrics! {
//!     println!("density: {:?}", profiler.last("density"));
//! }
//!
//! let mut fps = RateMeter::per_second();
//! fps.tick(frame_delta);
//! println!("FPS: {:.1}", fps.rate());
//! ```

#[cfg(feature = "metrics")]
mod rate_meter;
#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod stage_profiler;

#[cfg(feature = "metrics")]
pub use rate_meter::RateMeter;
#[cfg(feature = "metrics")]
pub use ring_buffer::{RingBuffer, Sample};
#[cfg(feature = "metrics")]
pub use stage_profiler::StageProfiler;

// ============================================================================
// Macros for conditional compilation
// ============================================================================

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone)]
pub struct RateMeter;

#[cfg(not(feature = "metrics"))]
impl RateMeter {
    pub fn new(_window: std::time::Duration) -> Self { Self }
    pub fn per_second() -> Self { Self }
    pub fn tick(&mut self, _delta: std::time::Duration) {}
    pub fn rate(&self) -> f64 { 0.0 }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone)]
pub struct StageProfiler;

#[cfg(not(feature = "metrics"))]
impl StageProfiler {
    pub fn new(_window: usize) -> Self { Self }
    pub fn time<F, R>(&mut self, _stage: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn last(&self, _stage: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn average(&self, _stage: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn stages(&self) -> impl Iterator<Item = (&'static str, std::time::Duration)> { std::iter::empty() }
    pub fn reset(&mut self) {}
}
