//! Pressure, viscosity and external forces.

use crate::field::MIN_DENSITY;
use crate::kernels::SphKernels;
use crate::neighbors::NeighborTable;
use crate::params::SimulationParams;
use crate::particle::Particle;
use glam::Vec3;
use rayon::prelude::*;

/// Read-only inputs shared by every lane of the force pass.
pub struct ForceInputs<'a> {
    pub particles: &'a [Particle],
    pub neighbors: &'a NeighborTable,
    pub density: &'a [f32],
    pub pressure: &'a [f32],
    pub kernels: &'a SphKernels,
    pub params: &'a SimulationParams,
}

impl ForceInputs<'_> {
    /// Symmetrized pressure force on `i` from `j`. Equal and opposite for the
    /// pair whenever their densities match.
    #[inline]
    pub fn pressure_pair(&self, i: usize, j: usize) -> Vec3 {
        let rho_j = self.density[j];
        if !(rho_j > MIN_DENSITY) {
            return Vec3::ZERO;
        }
        let delta = self.particles[i].position - self.particles[j].position;
        let Some((dir, r)) = SphKernels::direction(delta) else {
            return Vec3::ZERO;
        };
        let shared = (self.pressure[i] + self.pressure[j]) / (2.0 * rho_j);
        dir * (self.params.particle_mass * shared * self.kernels.spiky_grad(r))
    }

    /// Viscous force on `i` from `j`, pulling `i`'s velocity towards `j`'s.
    #[inline]
    pub fn viscosity_pair(&self, i: usize, j: usize) -> Vec3 {
        let rho_j = self.density[j];
        if !(rho_j > MIN_DENSITY) {
            return Vec3::ZERO;
        }
        let a = &self.particles[i];
        let b = &self.particles[j];
        let r = a.position.distance(b.position);
        let weight = self.params.viscosity * self.params.particle_mass / rho_j;
        (b.velocity - a.velocity) * (weight * self.kernels.viscosity_laplacian(r))
    }

    /// Net force on `i`: pair terms over its neighbors (self excluded) plus gravity.
    pub fn net_force(&self, i: usize) -> Vec3 {
        let mut force = self.params.gravity * self.params.particle_mass;
        for &j in self.neighbors.of(i) {
            let j = j as usize;
            if j == i {
                continue;
            }
            force += self.pressure_pair(i, j);
            force += self.viscosity_pair(i, j);
        }
        force
    }
}

/// Fill `force` for every live particle.
pub fn compute_forces(inputs: &ForceInputs<'_>, force: &mut [Vec3]) {
    force[..inputs.particles.len()]
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, f)| *f = inputs.net_force(i));
}
