//! The per-step SPH pipeline.
//!
//! Stages run strictly in order, each fully materialized before the next one
//! reads it: grid clear, grid build, neighbor search, density, pressure,
//! forces, integration. Inside a stage every lane writes only its own slot,
//! and the join at the end of each rayon iterator is the barrier between
//! stages.

use crate::field::{compute_density, compute_pressure, FluidField};
use crate::forces::{compute_forces, ForceInputs};
use crate::grid::SpatialGrid;
use crate::integrate::{integrate, Container};
use crate::kernels::SphKernels;
use crate::neighbors::NeighborTable;
use crate::params::{SimulationConfig, SimulationParams};
use crate::particle::ParticleStore;
use brook_metrics::StageProfiler;
use std::time::Duration;

/// Stage names, in execution order.
pub const STAGES: [&str; 7] = [
    "grid_clear",
    "grid_build",
    "neighbors",
    "density",
    "pressure",
    "forces",
    "integrate",
];

/// What one step did. Overflow counts are expected under load, not faults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub active: usize,
    /// Particles left out of the grid because their cell was full.
    pub cell_overflow: usize,
    /// Neighbor candidates dropped because a list reached its cap.
    pub neighbors_truncated: usize,
    /// Particles reset after their state went non-finite.
    pub sanitized: usize,
}

/// Scratch buffers for the pipeline, sized to one particle capacity.
pub struct FluidSolver {
    grid: SpatialGrid,
    neighbors: NeighborTable,
    field: FluidField,
    profiler: StageProfiler,
}

impl FluidSolver {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            grid: SpatialGrid::new(config.grid_resolution, config.cell_capacity),
            neighbors: NeighborTable::with_capacity(config.max_particles),
            field: FluidField::with_capacity(config.max_particles),
            profiler: StageProfiler::new(120),
        }
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    pub fn field(&self) -> &FluidField {
        &self.field
    }

    pub fn reset_field(&mut self) {
        self.field.reset();
    }

    /// Average time per stage (all zero without the `metrics` feature).
    pub fn stage_timings(&self) -> Vec<(&'static str, Duration)> {
        STAGES
            .iter()
            .map(|&stage| (stage, self.profiler.average(stage)))
            .collect()
    }

    /// Run one full step over the live particles of `store`.
    pub fn step(
        &mut self,
        store: &mut ParticleStore,
        params: &SimulationParams,
        center: glam::Vec3,
        dt: f32,
    ) -> StepStats {
        let active = store.active_count();
        let mut stats = StepStats {
            active,
            ..Default::default()
        };
        if active == 0 {
            return stats;
        }

        let h = params.smoothing_radius();
        let kernels = SphKernels::new(h);
        let container = Container::centered(center, params.container_size);
        let Self {
            grid,
            neighbors,
            field,
            profiler,
        } = self;

        profiler.time(STAGES[0], || {
            grid.place(center, h);
            grid.clear();
        });

        let particles = store.active();
        stats.cell_overflow = profiler.time(STAGES[1], || grid.build(particles));
        stats.neighbors_truncated =
            profiler.time(STAGES[2], || neighbors.find(particles, grid, h));

        profiler.time(STAGES[3], || {
            compute_density(
                particles,
                neighbors,
                &kernels,
                params.particle_mass,
                &mut field.density,
            )
        });
        profiler.time(STAGES[4], || {
            compute_pressure(
                &field.density[..active],
                params.stiffness,
                params.rest_density,
                &mut field.pressure,
            )
        });
        profiler.time(STAGES[5], || {
            let inputs = ForceInputs {
                particles,
                neighbors,
                density: &field.density,
                pressure: &field.pressure,
                kernels: &kernels,
                params,
            };
            compute_forces(&inputs, &mut field.force)
        });

        stats.sanitized = profiler.time(STAGES[6], || {
            integrate(
                store.active_mut(),
                &field.force[..active],
                params.particle_mass,
                dt,
                params.damping,
                &container,
            )
        });

        if stats.sanitized > 0 {
            tracing::warn!(
                sanitized = stats.sanitized,
                "reset particles with non-finite state"
            );
        }
        if stats.cell_overflow > 0 || stats.neighbors_truncated > 0 {
            tracing::debug!(
                active,
                cell_overflow = stats.cell_overflow,
                neighbors_truncated = stats.neighbors_truncated,
                "step hit capacity limits"
            );
        } else {
            tracing::trace!(active, "step complete");
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn config(max_particles: usize) -> SimulationConfig {
        SimulationConfig {
            max_particles,
            ..Default::default()
        }
    }

    #[test]
    fn empty_store_is_idle() {
        let config = config(16);
        let mut solver = FluidSolver::new(&config);
        let mut store = ParticleStore::with_capacity(16);
        let stats = solver.step(&mut store, &SimulationParams::default(), Vec3::ZERO, 1.0 / 60.0);
        assert_eq!(stats, StepStats::default());
    }

    #[test]
    fn step_keeps_every_particle_contained() {
        let config = config(512);
        let params = SimulationParams {
            container_size: Vec3::splat(2.0),
            ..Default::default()
        };
        let mut solver = FluidSolver::new(&config);
        let mut store = ParticleStore::with_capacity(512);
        for i in 0..512 {
            let x = (i % 8) as f32 * 0.21 - 0.7;
            let y = ((i / 8) % 8) as f32 * 0.21 - 0.7;
            let z = (i / 64) as f32 * 0.21 - 0.7;
            store.spawn(Vec3::new(x, y, z));
        }

        let container = Container::centered(Vec3::ZERO, params.container_size);
        for _ in 0..120 {
            solver.step(&mut store, &params, Vec3::ZERO, 1.0 / 60.0);
            for p in store.active() {
                assert!(p.position.is_finite());
                assert!(container.contains(p.position, 1e-4), "{:?}", p.position);
            }
        }
    }

    #[test]
    fn stage_timings_list_every_stage() {
        let solver = FluidSolver::new(&config(4));
        let names: Vec<_> = solver.stage_timings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, STAGES.to_vec());
    }
}
