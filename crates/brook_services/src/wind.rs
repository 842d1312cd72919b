//! Wind folded into the solver's gravity term.
//!
//! The solver only knows one external acceleration. Wind is added on top of
//! it every frame and the previous frame's contribution is taken back out
//! first, so it never accumulates.

use crate::input::WindInput;
use brook_core::FluidSimulation;
use glam::Vec3;

#[derive(Debug, Clone)]
pub struct WindController {
    enabled: bool,
    strength: f32,
    input: WindInput,
    /// Wind currently included in the simulation's gravity.
    applied: Vec3,
}

impl WindController {
    pub fn new(strength: f32) -> Self {
        Self {
            enabled: false,
            strength,
            input: WindInput::default(),
            applied: Vec3::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    pub fn set_input(&mut self, input: WindInput) {
        self.input = input;
    }

    /// Wind the next [`apply`](Self::apply) will fold in.
    pub fn wind(&self) -> Vec3 {
        if self.enabled {
            self.input.direction() * self.strength
        } else {
            Vec3::ZERO
        }
    }

    pub fn applied(&self) -> Vec3 {
        self.applied
    }

    pub fn set_enabled(&mut self, enabled: bool, sim: &mut FluidSimulation) {
        self.enabled = enabled;
        if !enabled {
            self.remove(sim);
        }
        tracing::debug!(enabled, "wind toggled");
    }

    /// Replace last frame's wind in `sim`'s gravity with this frame's.
    pub fn apply(&mut self, sim: &mut FluidSimulation) {
        let wind = self.wind();
        if wind == self.applied {
            return;
        }
        sim.set_gravity(sim.gravity() - self.applied + wind);
        self.applied = wind;
    }

    /// Take the applied wind back out of `sim`'s gravity.
    pub fn remove(&mut self, sim: &mut FluidSimulation) {
        sim.set_gravity(sim.gravity() - self.applied);
        self.applied = Vec3::ZERO;
    }

    /// Gravity without the wind contribution.
    pub fn base_gravity(&self, sim: &FluidSimulation) -> Vec3 {
        sim.gravity() - self.applied
    }
}

impl Default for WindController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_core::{SimulationConfig, SimulationParams};

    fn sim() -> FluidSimulation {
        FluidSimulation::new(
            SimulationConfig::default().with_max_particles(8),
            SimulationParams::default(),
        )
        .expect("valid config")
    }

    #[test]
    fn wind_does_not_accumulate_across_frames() {
        let mut sim = sim();
        let base = sim.gravity();
        let mut wind = WindController::new(2.0);
        wind.set_enabled(true, &mut sim);
        wind.set_input(WindInput {
            right: true,
            ..Default::default()
        });

        for _ in 0..10 {
            wind.apply(&mut sim);
        }
        assert_eq!(sim.gravity(), base + Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(wind.base_gravity(&sim), base);
    }

    #[test]
    fn disabling_restores_base_gravity() {
        let mut sim = sim();
        let base = sim.gravity();
        let mut wind = WindController::default();
        wind.set_enabled(true, &mut sim);
        wind.set_input(WindInput {
            up: true,
            ..Default::default()
        });
        wind.apply(&mut sim);
        assert_ne!(sim.gravity(), base);

        wind.set_enabled(false, &mut sim);
        assert_eq!(sim.gravity(), base);
        assert_eq!(wind.applied(), Vec3::ZERO);
    }

    #[test]
    fn releasing_keys_removes_wind() {
        let mut sim = sim();
        let base = sim.gravity();
        let mut wind = WindController::default();
        wind.set_enabled(true, &mut sim);
        wind.set_input(WindInput {
            left: true,
            ..Default::default()
        });
        wind.apply(&mut sim);
        wind.set_input(WindInput::default());
        wind.apply(&mut sim);
        assert_eq!(sim.gravity(), base);
    }
}
