//! The simulation handle: particle store, solver buffers and parameters for
//! one independent fluid.
//!
//! A [`SimulationConfig`] is the uninitialized form; [`FluidSimulation::new`]
//! allocates every buffer and leaves the simulation running. An empty store
//! is a valid idle state. Reallocation takes `&mut self`, so it can never
//! overlap a step.

use crate::error::SimulationError;
use crate::math::JitterRng;
use crate::params::{
    SimulationConfig, SimulationParams, SEED_LATTICE, SEED_SPACING_FACTOR,
};
use crate::particle::{Particle, ParticleStore};
use crate::solver::{FluidSolver, StepStats};
use glam::Vec3;
use std::time::Duration;

/// Owned copy of the live particle state, for rendering or inspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleSnapshot {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    /// Density from the most recent step.
    pub densities: Vec<f32>,
    pub particle_radius: f32,
}

impl ParticleSnapshot {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub struct FluidSimulation {
    config: SimulationConfig,
    params: SimulationParams,
    store: ParticleStore,
    solver: FluidSolver,
    jitter: JitterRng,
    steps: u64,
}

impl FluidSimulation {
    /// Allocate buffers for `config` and seed the initial lattice.
    pub fn new(config: SimulationConfig, params: SimulationParams) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut sim = Self {
            store: ParticleStore::with_capacity(config.max_particles),
            solver: FluidSolver::new(&config),
            jitter: JitterRng::new(config.jitter_seed),
            config,
            params,
            steps: 0,
        };
        sim.seed_lattice();

        tracing::info!(
            max_particles = config.max_particles,
            grid = config.grid_resolution,
            seeded = sim.active_count(),
            "fluid simulation created"
        );
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Direct access to every physical parameter; changes apply next step.
    pub fn params_mut(&mut self) -> &mut SimulationParams {
        &mut self.params
    }

    pub fn set_params(&mut self, params: SimulationParams) {
        self.params = params;
    }

    pub fn active_count(&self) -> usize {
        self.store.active_count()
    }

    pub fn max_particles(&self) -> usize {
        self.store.capacity()
    }

    /// Steps run since creation or the last reallocation.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.active()
    }

    /// Density of live particle `index` from the most recent step.
    pub fn density(&self, index: usize) -> Option<f32> {
        if index < self.active_count() {
            self.solver.field().density.get(index).copied()
        } else {
            None
        }
    }

    pub fn solver(&self) -> &FluidSolver {
        &self.solver
    }

    pub fn stage_timings(&self) -> Vec<(&'static str, Duration)> {
        self.solver.stage_timings()
    }

    /// Advance by `dt` seconds. Does nothing while the store is empty.
    pub fn step(&mut self, dt: f32) -> StepStats {
        let stats = self.solver.step(
            &mut self.store,
            &self.params,
            self.config.container_center,
            dt,
        );
        if stats.active > 0 {
            self.steps += 1;
        }
        stats
    }

    /// Advance by the configured fixed timestep.
    pub fn tick(&mut self) -> StepStats {
        self.step(self.config.timestep)
    }

    pub fn snapshot(&self) -> ParticleSnapshot {
        let particles = self.store.active();
        ParticleSnapshot {
            positions: particles.iter().map(|p| p.position).collect(),
            velocities: particles.iter().map(|p| p.velocity).collect(),
            densities: self.solver.field().density[..particles.len()].to_vec(),
            particle_radius: self.params.particle_radius,
        }
    }

    // ------------------------------------------------------------------
    // Spawning and lifecycle
    // ------------------------------------------------------------------

    /// Spawn one particle at rest. `None` when the store is full.
    pub fn spawn_at(&mut self, position: Vec3) -> Option<usize> {
        self.store.spawn(position)
    }

    /// Spawn up to `count` particles around `position`, each jittered by up
    /// to half a particle radius per axis. Returns how many were placed.
    pub fn spawn_batch(&mut self, position: Vec3, count: usize) -> usize {
        self.spawn_scattered(position, count, self.params.particle_radius)
    }

    /// Like [`spawn_batch`](Self::spawn_batch) with an explicit jitter extent.
    pub fn spawn_scattered(&mut self, position: Vec3, count: usize, spread: f32) -> usize {
        let mut spawned = 0;
        while spawned < count && !self.store.is_full() {
            let offset = self.jitter.offset(spread);
            if self.store.spawn(position + offset).is_none() {
                break;
            }
            spawned += 1;
        }
        spawned
    }

    /// Remove every particle. Buffers are kept.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.solver.reset_field();
        tracing::info!("cleared all particles");
    }

    /// Clear, then reseed the deterministic initial lattice.
    pub fn reset_to_initial(&mut self) {
        self.store.clear();
        self.solver.reset_field();
        self.seed_lattice();
        tracing::info!(seeded = self.active_count(), "simulation reset");
    }

    /// Reallocate every buffer for a new particle capacity, then reseed.
    ///
    /// Old particles are never carried over, even if they would fit.
    pub fn set_max_capacity(&mut self, max_particles: usize) {
        self.config.max_particles = max_particles;
        self.store = ParticleStore::with_capacity(max_particles);
        self.solver = FluidSolver::new(&self.config);
        self.steps = 0;
        self.seed_lattice();
        tracing::info!(
            max_particles,
            seeded = self.active_count(),
            "reallocated simulation buffers"
        );
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    pub fn gravity(&self) -> Vec3 {
        self.params.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.params.gravity = gravity;
    }

    pub fn set_viscosity(&mut self, viscosity: f32) {
        self.params.viscosity = viscosity;
    }

    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.params.stiffness = stiffness;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.params.damping = damping;
    }

    pub fn set_rest_density(&mut self, rest_density: f32) {
        self.params.rest_density = rest_density;
    }

    pub fn set_particle_radius(&mut self, radius: f32) {
        self.params.particle_radius = radius;
    }

    pub fn set_particle_mass(&mut self, mass: f32) {
        self.params.particle_mass = mass;
    }

    /// Fill an 8×8×8 lattice spaced at 2.1 radii, stopping at capacity.
    fn seed_lattice(&mut self) {
        let spacing = self.params.particle_radius * SEED_SPACING_FACTOR;
        let area = self.config.spawn_area;
        let base = self.config.container_center
            + self.config.spawn_offset
            + Vec3::new(-0.5 * area.x, 0.0, -0.5 * area.z);

        for x in 0..SEED_LATTICE {
            for y in 0..SEED_LATTICE {
                for z in 0..SEED_LATTICE {
                    let cell = Vec3::new(x as f32, y as f32, z as f32);
                    if self.store.spawn(base + cell * spacing).is_none() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_sim_with(max_particles: usize, params: SimulationParams) -> FluidSimulation {
        let config = SimulationConfig::default().with_max_particles(max_particles);
        FluidSimulation::new(config, params).expect("valid config")
    }

    fn new_sim(max_particles: usize) -> FluidSimulation {
        new_sim_with(max_particles, SimulationParams::default())
    }

    #[test]
    fn new_seeds_full_lattice() {
        let sim = new_sim(512);
        assert_eq!(sim.active_count(), 512);
        assert_eq!(sim.max_particles(), 512);
    }

    #[test]
    fn lattice_stops_at_capacity() {
        let sim = new_sim(100);
        assert_eq!(sim.active_count(), 100);

        let sim = new_sim_with(0, SimulationParams::default());
        assert_eq!(sim.active_count(), 0);
    }

    #[test]
    fn lattice_spacing_and_origin() {
        let sim = new_sim(8192);
        let p = sim.particles();
        // z is the innermost loop.
        assert!((p[1].position - p[0].position - Vec3::new(0.0, 0.0, 0.21)).length() < 1e-5);
        assert!((p[0].position - Vec3::new(-1.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn lattice_sits_on_center_plus_offset() {
        let config = SimulationConfig {
            container_center: Vec3::new(1.0, 2.0, 3.0),
            spawn_offset: Vec3::new(0.5, 1.0, -0.5),
            ..SimulationConfig::default().with_max_particles(512)
        };
        let sim = FluidSimulation::new(config, SimulationParams::default()).expect("valid config");
        let p = sim.particles();

        // Offset applied once on every axis, lattice footprint centered in x/z.
        assert!((p[0].position - Vec3::new(0.5, 3.0, 1.5)).length() < 1e-5);
        let next_x = SEED_LATTICE * SEED_LATTICE;
        assert!((p[next_x].position - Vec3::new(0.71, 3.0, 1.5)).length() < 1e-5);
        let top = p[SEED_LATTICE - 1 + SEED_LATTICE * (SEED_LATTICE - 1)].position;
        assert!((top.y - (3.0 + 7.0 * 0.21)).abs() < 1e-5);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimulationConfig {
            grid_resolution: 0,
            ..Default::default()
        };
        assert!(FluidSimulation::new(config, SimulationParams::default()).is_err());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut sim = new_sim(1024);
        sim.spawn_batch(Vec3::ONE, 20);
        for _ in 0..10 {
            sim.tick();
        }

        sim.reset_to_initial();
        let first = sim.particles().to_vec();
        sim.reset_to_initial();
        let second = sim.particles().to_vec();

        assert_eq!(first.len(), 512);
        assert_eq!(first, second);
    }

    #[test]
    fn spawn_respects_capacity() {
        let mut sim = new_sim(520);
        assert_eq!(sim.spawn_batch(Vec3::ZERO, 50), 8);
        assert_eq!(sim.active_count(), 520);
        assert_eq!(sim.spawn_at(Vec3::ZERO), None);
        assert_eq!(sim.spawn_batch(Vec3::ZERO, 5), 0);
    }

    #[test]
    fn batch_jitter_stays_within_half_radius() {
        let mut sim = new_sim(600);
        sim.clear_all();
        let center = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(sim.spawn_batch(center, 50), 50);

        let half = 0.5 * sim.params().particle_radius;
        for p in sim.particles() {
            assert!((p.position - center).abs().max_element() <= half + 1e-6);
            assert_eq!(p.velocity, Vec3::ZERO);
        }
    }

    #[test]
    fn clear_then_spawn_reuses_prefix() {
        let mut sim = new_sim(16);
        sim.clear_all();
        assert_eq!(sim.active_count(), 0);
        assert_eq!(sim.spawn_at(Vec3::Y), Some(0));
        assert_eq!(sim.particles()[0].position, Vec3::Y);
    }

    #[test]
    fn capacity_invariant_over_mixed_calls() {
        let mut sim = new_sim(64);
        for round in 0..200usize {
            match round % 7 {
                0 => sim.clear_all(),
                1 => {
                    sim.spawn_batch(Vec3::ZERO, round % 11);
                }
                _ => {
                    sim.spawn_at(Vec3::splat(round as f32 * 0.01));
                }
            }
            assert!(sim.active_count() <= sim.max_particles());
        }
    }

    #[test]
    fn shrinking_capacity_reseeds_from_scratch() {
        let mut sim = new_sim(2048);
        sim.spawn_batch(Vec3::new(2.0, 2.0, 2.0), 600);
        for _ in 0..5 {
            sim.tick();
        }
        assert!(sim.active_count() > 300);

        sim.set_max_capacity(300);
        assert_eq!(sim.max_particles(), 300);
        assert_eq!(sim.active_count(), 300);
        assert_eq!(sim.step_count(), 0);

        let fresh = new_sim(300);
        assert_eq!(sim.particles(), fresh.particles());
    }

    #[test]
    fn isolated_particle_density_is_self_term() {
        let mut sim = new_sim(16);
        sim.clear_all();
        sim.spawn_at(Vec3::ZERO);
        sim.spawn_at(Vec3::splat(3.0));
        sim.tick();

        let params = sim.params();
        let kernels = crate::kernels::SphKernels::new(params.smoothing_radius());
        let expected = params.particle_mass * kernels.poly6(0.0);
        assert_eq!(sim.density(0), Some(expected));
        assert_eq!(sim.density(1), Some(expected));
        assert_eq!(sim.density(2), None);
    }

    #[test]
    fn falling_particle_bounces_off_floor() {
        let params = SimulationParams {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            ..Default::default()
        };
        let mut sim = new_sim_with(16, params);
        sim.clear_all();
        sim.spawn_at(Vec3::new(0.0, 5.0, 0.0));

        let dt = 1.0 / 60.0;
        let floor = -0.5 * params.container_size.y;
        let damping = params.damping;
        let mut bounced = false;

        for _ in 0..600 {
            let before = sim.particles()[0];
            sim.step(dt);
            let after = sim.particles()[0];

            assert!(after.position.y >= floor);
            if before.velocity.y < 0.0 && after.velocity.y > 0.0 {
                let impact = before.velocity.y + params.gravity.y * dt;
                assert_eq!(after.position.y, floor);
                assert!((after.velocity.y - (-impact * damping)).abs() < 1e-4);
                bounced = true;
                break;
            }
        }
        assert!(bounced, "particle never reached the floor");
    }

    #[test]
    fn containment_holds_under_default_settings() {
        let mut sim = new_sim(1024);
        sim.spawn_scattered(Vec3::new(0.0, 3.0, 0.0), 256, 1.5);
        let half = sim.params().half_extent();
        for _ in 0..240 {
            sim.tick();
            for p in sim.particles() {
                assert!(p.position.abs().cmple(half + 1e-4).all(), "{:?}", p.position);
            }
        }
    }

    #[test]
    fn independent_simulations_do_not_share_state() {
        let mut a = new_sim(512);
        let b = new_sim(512);
        a.set_gravity(Vec3::new(3.0, 0.0, 0.0));
        a.tick();
        assert_eq!(b.gravity(), SimulationParams::default().gravity);
        assert_ne!(a.particles(), b.particles());
    }

    #[test]
    fn snapshot_copies_live_particles() {
        let mut sim = new_sim(32);
        sim.tick();
        let snap = sim.snapshot();
        assert_eq!(snap.len(), 32);
        assert_eq!(snap.positions[3], sim.particles()[3].position);
        assert!(snap.densities.iter().all(|&d| d > 0.0));
    }
}
