//! Brook Core
//!
//! Real-time Smoothed Particle Hydrodynamics on the CPU:
//! - Fixed-capacity particle store
//! - Uniform grid neighbor search with bounded per-particle lists
//! - Density, pressure, viscosity and gravity
//! - Semi-implicit integration inside an axis-aligned container
//! - Fixed-timestep clock for host loops
//!
//! ```no_run
//! use brook_core::{FluidSimulation, SimulationConfig, SimulationParams};
//!
//! let mut sim = FluidSimulation::new(SimulationConfig::default(), SimulationParams::default())
//!     .expect("default config is valid");
//! for _ in 0..60 {
//!     sim.tick();
//! }
//! println!("{} particles", sim.active_count());
//! ```

pub mod error;
pub mod field;
pub mod forces;
pub mod grid;
pub mod integrate;
pub mod kernels;
pub mod math;
pub mod neighbors;
pub mod params;
pub mod particle;
pub mod simulation;
pub mod solver;
pub mod time;

pub use glam;

pub use error::SimulationError;
pub use params::{SimulationConfig, SimulationParams, MAX_NEIGHBORS};
pub use particle::{Particle, ParticleStore};
pub use simulation::{FluidSimulation, ParticleSnapshot};
pub use solver::{FluidSolver, StepStats};
pub use time::FixedTimestep;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
