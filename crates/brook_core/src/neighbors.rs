//! Bounded per-particle neighbor lists.
//!
//! Lists live in one flat arena indexed by `particle * MAX_NEIGHBORS + slot`,
//! so a step never allocates. Slot 0 of every live particle's list is the
//! particle itself; the density sum needs the self term even when the grid
//! dropped that particle from its cell.

use crate::grid::SpatialGrid;
use crate::params::MAX_NEIGHBORS;
use crate::particle::Particle;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct NeighborTable {
    entries: Vec<u32>,
    counts: Vec<u32>,
}

impl NeighborTable {
    pub fn with_capacity(max_particles: usize) -> Self {
        Self {
            entries: vec![0; max_particles * MAX_NEIGHBORS],
            counts: vec![0; max_particles],
        }
    }

    pub fn capacity(&self) -> usize {
        self.counts.len()
    }

    /// Neighbors of particle `i`, self first.
    #[inline]
    pub fn of(&self, i: usize) -> &[u32] {
        let start = i * MAX_NEIGHBORS;
        &self.entries[start..start + self.counts[i] as usize]
    }

    /// Fill the lists of all live particles from a built grid.
    ///
    /// Candidates are accepted when strictly closer than `radius`. Returns the
    /// number of accepted candidates discarded because a list was full.
    pub fn find(&mut self, particles: &[Particle], grid: &SpatialGrid, radius: f32) -> usize {
        let active = particles.len().min(self.counts.len());
        let radius_sq = radius * radius;

        self.entries[..active * MAX_NEIGHBORS]
            .par_chunks_mut(MAX_NEIGHBORS)
            .zip(self.counts[..active].par_iter_mut())
            .enumerate()
            .map(|(i, (list, count))| {
                let position = particles[i].position;
                list[0] = i as u32;
                let mut len = 1;
                let mut truncated = 0;

                grid.for_each_candidate(grid.cell_of(position), |j| {
                    if j as usize == i {
                        return;
                    }
                    let Some(other) = particles.get(j as usize) else {
                        return;
                    };
                    if position.distance_squared(other.position) >= radius_sq {
                        return;
                    }
                    if len < MAX_NEIGHBORS {
                        list[len] = j;
                        len += 1;
                    } else {
                        truncated += 1;
                    }
                });

                *count = len as u32;
                truncated
            })
            .sum()
    }
}
