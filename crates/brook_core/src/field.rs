//! Per-particle scalar fields derived each step.

use crate::kernels::SphKernels;
use crate::neighbors::NeighborTable;
use crate::particle::Particle;
use glam::Vec3;
use rayon::prelude::*;

/// Densities at or below this are treated as empty space by the force pass.
pub const MIN_DENSITY: f32 = 1e-6;

/// Step-local density, pressure and net force for every slot.
#[derive(Debug, Clone)]
pub struct FluidField {
    pub density: Vec<f32>,
    pub pressure: Vec<f32>,
    pub force: Vec<Vec3>,
}

impl FluidField {
    pub fn with_capacity(max_particles: usize) -> Self {
        Self {
            density: vec![0.0; max_particles],
            pressure: vec![0.0; max_particles],
            force: vec![Vec3::ZERO; max_particles],
        }
    }

    pub fn capacity(&self) -> usize {
        self.density.len()
    }

    pub fn reset(&mut self) {
        self.density.fill(0.0);
        self.pressure.fill(0.0);
        self.force.fill(Vec3::ZERO);
    }
}

/// `density[i] = mass * Σ W_poly6(|x_i - x_j|)` over `i`'s list, self included.
pub fn compute_density(
    particles: &[Particle],
    neighbors: &NeighborTable,
    kernels: &SphKernels,
    mass: f32,
    density: &mut [f32],
) {
    density[..particles.len()]
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, rho)| {
            let position = particles[i].position;
            let sum: f32 = neighbors
                .of(i)
                .iter()
                .map(|&j| kernels.poly6(position.distance_squared(particles[j as usize].position)))
                .sum();
            *rho = mass * sum;
        });
}

/// Equation of state `p = k * max(ρ - ρ0, 0)`. Never negative, so pressure
/// only ever pushes particles apart.
pub fn compute_pressure(density: &[f32], stiffness: f32, rest_density: f32, pressure: &mut [f32]) {
    pressure[..density.len()]
        .par_iter_mut()
        .zip(density.par_iter())
        .for_each(|(p, &rho)| {
            *p = stiffness * (rho - rest_density).max(0.0);
        });
}
