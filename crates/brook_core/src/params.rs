//! Simulation parameters and buffer configuration
//!
//! [`SimulationParams`] holds the physical coefficients read fresh on every
//! step. [`SimulationConfig`] holds the structural values that size the
//! buffers; changing those means reallocating.

use crate::error::SimulationError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Hard cap on entries in one particle's neighbor list (self included).
pub const MAX_NEIGHBORS: usize = 64;

/// Lattice edge length used by the initial seeding routine.
pub const SEED_LATTICE: usize = 8;

/// Lattice spacing as a multiple of particle radius.
pub const SEED_SPACING_FACTOR: f32 = 2.1;

/// Accepted range for the fixed physics step, in seconds.
pub const MIN_TIMESTEP: f32 = 1e-6;
pub const MAX_TIMESTEP: f32 = 1.0;

/// Physical coefficients. No validation is applied; out-of-range values are
/// accepted and simply make the fluid misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub particle_radius: f32,
    pub particle_mass: f32,
    pub rest_density: f32,
    pub viscosity: f32,
    pub stiffness: f32,
    /// Velocity scale applied on a boundary bounce.
    pub damping: f32,
    /// External acceleration. Hosts fold wind into this before a tick.
    pub gravity: Vec3,
    /// Full extent of the axis-aligned container.
    pub container_size: Vec3,
    /// Smoothing radius as a multiple of particle radius.
    pub smoothing_factor: f32,
}

impl SimulationParams {
    /// Kernel support `h`; also the grid cell size.
    pub fn smoothing_radius(&self) -> f32 {
        self.particle_radius * self.smoothing_factor
    }

    pub fn half_extent(&self) -> Vec3 {
        self.container_size * 0.5
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            particle_radius: 0.1,
            particle_mass: 1.0,
            rest_density: 1000.0,
            viscosity: 0.1,
            stiffness: 200.0,
            damping: 0.9,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            container_size: Vec3::splat(10.0),
            smoothing_factor: 4.0,
        }
    }
}

/// Buffer sizing and placement. Fixed for the lifetime of one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_particles: usize,
    /// Cells per axis of the uniform grid.
    pub grid_resolution: usize,
    /// Particle indices one grid cell can hold; extra entries are dropped.
    pub cell_capacity: usize,
    pub container_center: Vec3,
    /// Footprint of the initial lattice, relative to the container center.
    pub spawn_area: Vec3,
    pub spawn_offset: Vec3,
    /// Fixed physics step in seconds.
    pub timestep: f32,
    pub jitter_seed: u64,
}

impl SimulationConfig {
    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.grid_resolution == 0 {
            return Err(SimulationError::InvalidConfig {
                field: "grid_resolution",
                reason: "must be at least 1",
            });
        }
        if self.grid_resolution > 1024 {
            return Err(SimulationError::InvalidConfig {
                field: "grid_resolution",
                reason: "must be at most 1024",
            });
        }
        if self.cell_capacity == 0 {
            return Err(SimulationError::InvalidConfig {
                field: "cell_capacity",
                reason: "must be at least 1",
            });
        }
        if !self.container_center.is_finite() {
            return Err(SimulationError::InvalidConfig {
                field: "container_center",
                reason: "must be finite",
            });
        }
        if !self.spawn_area.is_finite() || !self.spawn_offset.is_finite() {
            return Err(SimulationError::InvalidConfig {
                field: "spawn_area",
                reason: "must be finite",
            });
        }
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(SimulationError::InvalidConfig {
                field: "timestep",
                reason: "must be positive and finite",
            });
        }
        if self.timestep < MIN_TIMESTEP {
            return Err(SimulationError::InvalidConfig {
                field: "timestep",
                reason: "must be at least one microsecond",
            });
        }
        if self.timestep > MAX_TIMESTEP {
            return Err(SimulationError::InvalidConfig {
                field: "timestep",
                reason: "must be at most one second",
            });
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_particles: 8192,
            grid_resolution: 32,
            cell_capacity: 10,
            container_center: Vec3::ZERO,
            spawn_area: Vec3::splat(2.0),
            spawn_offset: Vec3::ZERO,
            timestep: 1.0 / 60.0,
            jitter_seed: 0x5eed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_radius_tracks_particle_radius() {
        let mut params = SimulationParams::default();
        assert!((params.smoothing_radius() - 0.4).abs() < 1e-6);
        params.particle_radius = 0.05;
        assert!((params.smoothing_radius() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_unusable_grid() {
        let config = SimulationConfig {
            grid_resolution: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig { field: "grid_resolution", .. })
        ));

        let config = SimulationConfig {
            cell_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            timestep: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_timesteps_the_clock_cannot_represent() {
        for timestep in [1e20, 2.0, 1e-10, 5e-7, f32::NAN, -1.0 / 60.0] {
            let config = SimulationConfig {
                timestep,
                ..Default::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(SimulationError::InvalidConfig { field: "timestep", .. })
                ),
                "timestep {timestep} accepted"
            );
        }
    }

    #[test]
    fn accepted_timesteps_give_a_ticking_clock() {
        for timestep in [MIN_TIMESTEP, 1.0 / 240.0, 1.0 / 60.0, MAX_TIMESTEP] {
            let config = SimulationConfig {
                timestep,
                ..Default::default()
            };
            assert_eq!(config.validate(), Ok(()));
            let mut clock = crate::time::FixedTimestep::from_seconds(config.timestep);
            assert!(!clock.step().is_zero(), "timestep {timestep}");
            assert!(clock.advance(std::time::Duration::from_secs(1)) > 0);
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: SimulationParams =
            serde_json::from_str(r#"{ "viscosity": 0.5 }"#).expect("parse params");
        assert_eq!(params.viscosity, 0.5);
        assert_eq!(params.stiffness, 200.0);

        let config: SimulationConfig =
            serde_json::from_str(r#"{ "max_particles": 512 }"#).expect("parse config");
        assert_eq!(config.max_particles, 512);
        assert_eq!(config.grid_resolution, 32);
    }
}
