//! Value ranges exposed by the control panel.
//!
//! The solver accepts any value; these ranges only bound what a panel offers
//! and what [`crate::FluidController`] forwards from slider actions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp into the range. NaN maps to `min`.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const MAX_PARTICLES_MIN: usize = 512;
pub const MAX_PARTICLES_MAX: usize = 16384;

pub const VISCOSITY: ParamRange = ParamRange::new(0.01, 1.0);
pub const STIFFNESS: ParamRange = ParamRange::new(50.0, 1000.0);
pub const DAMPING: ParamRange = ParamRange::new(0.1, 1.0);
pub const GRAVITY_Y: ParamRange = ParamRange::new(-20.0, 0.0);

pub fn clamp_max_particles(value: usize) -> usize {
    value.clamp(MAX_PARTICLES_MIN, MAX_PARTICLES_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_slider_values() {
        assert_eq!(VISCOSITY.clamp(5.0), 1.0);
        assert_eq!(STIFFNESS.clamp(10.0), 50.0);
        assert_eq!(GRAVITY_Y.clamp(3.0), 0.0);
        assert_eq!(DAMPING.clamp(f32::NAN), 0.1);
        assert!(DAMPING.contains(0.9));
        assert_eq!(clamp_max_particles(10), 512);
        assert_eq!(clamp_max_particles(100_000), 16384);
    }
}
