//! SPH smoothing kernels (Müller et al. 2003)
//!
//! Coefficients depend only on `h`, so they are folded once per step.

use glam::Vec3;
use std::f32::consts::PI;

/// Kernel coefficients for one smoothing radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphKernels {
    h: f32,
    h2: f32,
    poly6: f32,
    spiky_grad: f32,
    viscosity_laplacian: f32,
}

impl SphKernels {
    pub fn new(h: f32) -> Self {
        let h2 = h * h;
        let h6 = h2 * h2 * h2;
        let h9 = h6 * h2 * h;
        Self {
            h,
            h2,
            poly6: 315.0 / (64.0 * PI * h9),
            spiky_grad: 45.0 / (PI * h6),
            viscosity_laplacian: 45.0 / (PI * h6),
        }
    }

    pub fn radius(&self) -> f32 {
        self.h
    }

    pub fn radius_sq(&self) -> f32 {
        self.h2
    }

    /// Density kernel, evaluated from squared distance.
    #[inline]
    pub fn poly6(&self, r2: f32) -> f32 {
        if r2 < self.h2 {
            let d = self.h2 - r2;
            self.poly6 * d * d * d
        } else {
            0.0
        }
    }

    /// Magnitude of the spiky kernel gradient at distance `r`. The gradient
    /// points from the neighbor towards the particle.
    #[inline]
    pub fn spiky_grad(&self, r: f32) -> f32 {
        if r > 0.0 && r < self.h {
            let d = self.h - r;
            self.spiky_grad * d * d
        } else {
            0.0
        }
    }

    /// Laplacian of the viscosity kernel at distance `r`.
    #[inline]
    pub fn viscosity_laplacian(&self, r: f32) -> f32 {
        if r < self.h {
            self.viscosity_laplacian * (self.h - r)
        } else {
            0.0
        }
    }

    /// Unit direction and length of `delta`; `None` for coincident points.
    #[inline]
    pub fn direction(delta: Vec3) -> Option<(Vec3, f32)> {
        let r = delta.length();
        if r > f32::EPSILON {
            Some((delta / r, r))
        } else {
            None
        }
    }
}
