//! Uniform 3-D grid for neighbor search.
//!
//! The grid covers `resolution³` cells of edge `cell_size`, centered on the
//! container. It is rebuilt from scratch every step. Each cell stores at most
//! `cell_capacity` particle indices in a flat arena; extra entries are dropped.

use crate::particle::Particle;
use glam::{IVec3, UVec3, Vec3};
use rayon::prelude::*;

/// Offsets of the 3×3×3 block around a cell.
pub const NEIGHBOR_OFFSETS: [IVec3; 27] = {
    let mut offsets = [IVec3::ZERO; 27];
    let mut i = 0;
    while i < 27 {
        offsets[i] = IVec3::new(
            (i % 3) as i32 - 1,
            ((i / 3) % 3) as i32 - 1,
            (i / 9) as i32 - 1,
        );
        i += 1;
    }
    offsets
};

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    resolution: usize,
    cell_capacity: usize,
    cell_size: f32,
    origin: Vec3,
    /// `resolution³ * cell_capacity` particle indices.
    entries: Vec<u32>,
    counts: Vec<u32>,
}

impl SpatialGrid {
    pub fn new(resolution: usize, cell_capacity: usize) -> Self {
        let cells = resolution * resolution * resolution;
        Self {
            resolution,
            cell_capacity,
            cell_size: 1.0,
            origin: Vec3::ZERO,
            entries: vec![0; cells * cell_capacity],
            counts: vec![0; cells],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn cell_capacity(&self) -> usize {
        self.cell_capacity
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Place the grid for this step: cells of `cell_size`, centered on `center`.
    pub fn place(&mut self, center: Vec3, cell_size: f32) {
        self.cell_size = cell_size;
        self.origin = center - Vec3::splat(0.5 * self.resolution as f32 * cell_size);
    }

    /// Reset every cell count to zero.
    pub fn clear(&mut self) {
        self.counts.par_iter_mut().for_each(|count| *count = 0);
    }

    /// Scatter live particles into cells. Returns how many entries were
    /// dropped because their cell was full.
    pub fn build(&mut self, particles: &[Particle]) -> usize {
        let mut dropped = 0;
        for (index, particle) in particles.iter().enumerate() {
            let cell = self.cell_index(self.cell_of(particle.position));
            let count = self.counts[cell] as usize;
            if count < self.cell_capacity {
                self.entries[cell * self.cell_capacity + count] = index as u32;
                self.counts[cell] += 1;
            } else {
                dropped += 1;
            }
        }
        dropped
    }

    /// Cell coordinate of `position`, clamped into the grid so stray or
    /// corrupted particles still land in a valid cell.
    pub fn cell_of(&self, position: Vec3) -> UVec3 {
        let max = (self.resolution as i32 - 1).max(0);
        let relative = (position - self.origin) / self.cell_size;
        // `as` saturates and maps NaN to 0, so this is total.
        let coord = IVec3::new(
            relative.x.floor() as i32,
            relative.y.floor() as i32,
            relative.z.floor() as i32,
        );
        coord.clamp(IVec3::ZERO, IVec3::splat(max)).as_uvec3()
    }

    /// Particle indices stored in `coord`; empty for out-of-grid coordinates.
    pub fn cell(&self, coord: IVec3) -> &[u32] {
        let r = self.resolution as i32;
        if coord.cmplt(IVec3::ZERO).any() || coord.cmpge(IVec3::splat(r)).any() {
            return &[];
        }
        let cell = self.cell_index(coord.as_uvec3());
        let start = cell * self.cell_capacity;
        &self.entries[start..start + self.counts[cell] as usize]
    }

    /// Visit every candidate in the 3×3×3 block around `center`.
    pub fn for_each_candidate(&self, center: UVec3, mut f: impl FnMut(u32)) {
        let center = center.as_ivec3();
        for offset in NEIGHBOR_OFFSETS {
            for &candidate in self.cell(center + offset) {
                f(candidate);
            }
        }
    }

    /// Total entries currently stored.
    pub fn occupancy(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    #[inline]
    fn cell_index(&self, coord: UVec3) -> usize {
        let r = self.resolution;
        (coord.z as usize * r + coord.y as usize) * r + coord.x as usize
    }
}
