//! Semi-implicit Euler with axis-aligned box containment.

use crate::particle::Particle;
use glam::Vec3;
use rayon::prelude::*;

/// Axis-aligned container the particles are kept inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub min: Vec3,
    pub max: Vec3,
}

impl Container {
    pub fn centered(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3, tolerance: f32) -> bool {
        point.cmpge(self.min - tolerance).all() && point.cmple(self.max + tolerance).all()
    }
}

/// Advance one particle by `dt`.
///
/// Velocity takes the acceleration first, then the candidate position is
/// tested per axis: a component leaving the box is clamped to the wall and
/// that axis's velocity is reflected and scaled by `damping`. Returns `false`
/// if the particle had to be reset because its state went non-finite.
#[inline]
pub fn integrate_particle(
    particle: &mut Particle,
    acceleration: Vec3,
    dt: f32,
    damping: f32,
    container: &Container,
) -> bool {
    particle.acceleration = acceleration;
    let mut velocity = particle.velocity + acceleration * dt;
    let mut position = particle.position + velocity * dt;

    for axis in 0..3 {
        if position[axis] < container.min[axis] {
            position[axis] = container.min[axis];
            velocity[axis] = -velocity[axis] * damping;
        } else if position[axis] > container.max[axis] {
            position[axis] = container.max[axis];
            velocity[axis] = -velocity[axis] * damping;
        }
    }

    if !(position.is_finite() && velocity.is_finite()) {
        particle.position = container.center();
        particle.velocity = Vec3::ZERO;
        particle.acceleration = Vec3::ZERO;
        return false;
    }

    particle.velocity = velocity;
    particle.position = position;
    true
}

/// Integrate every live particle from its net force. Returns how many
/// particles were reset for carrying non-finite state.
pub fn integrate(
    particles: &mut [Particle],
    force: &[Vec3],
    mass: f32,
    dt: f32,
    damping: f32,
    container: &Container,
) -> usize {
    particles
        .par_iter_mut()
        .zip(force.par_iter())
        .filter_map(|(particle, &f)| {
            let ok = integrate_particle(particle, f / mass, dt, damping, container);
            (!ok).then_some(())
        })
        .count()
}
