//! Particle records and the fixed-capacity store that owns them.
//!
//! Live particles always occupy the prefix `[0, active)`. There is no free
//! list: particles are only ever removed all at once by [`ParticleStore::clear`].

use glam::Vec3;

/// One simulation slot.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Net force over mass from the most recent step.
    pub acceleration: Vec3,
    /// `0` marks an unused slot, anything above `0` is live.
    pub life: f32,
}

impl Particle {
    /// A freshly spawned particle at rest.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            life: 1.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Fixed-capacity particle array plus a live-count cursor.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    slots: Vec<Particle>,
    active: usize,
}

impl ParticleStore {
    /// Allocate `capacity` zeroed slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            active: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.active >= self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Write a new particle at the end of the live prefix.
    ///
    /// Returns the slot index, or `None` when the store is full. A full store
    /// is a normal steady state, not an error.
    pub fn spawn(&mut self, position: Vec3) -> Option<usize> {
        if self.is_full() {
            tracing::trace!(capacity = self.capacity(), "spawn rejected, store full");
            return None;
        }
        let index = self.active;
        self.slots[index] = Particle::at(position);
        self.active += 1;
        Some(index)
    }

    /// Drop every particle and zero all slots.
    pub fn clear(&mut self) {
        self.slots.fill(Particle::default());
        self.active = 0;
    }

    /// Live particles.
    #[inline]
    pub fn active(&self) -> &[Particle] {
        &self.slots[..self.active]
    }

    #[inline]
    pub(crate) fn active_mut(&mut self) -> &mut [Particle] {
        &mut self.slots[..self.active]
    }

    /// Every slot, including the zeroed tail.
    #[inline]
    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.active().get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_fills_prefix_in_order() {
        let mut store = ParticleStore::with_capacity(3);
        assert_eq!(store.spawn(Vec3::X), Some(0));
        assert_eq!(store.spawn(Vec3::Y), Some(1));
        assert_eq!(store.active_count(), 2);

        let p = store.get(1).expect("slot 1 is live");
        assert_eq!(p.position, Vec3::Y);
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(p.life, 1.0);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn spawn_is_noop_when_full() {
        let mut store = ParticleStore::with_capacity(2);
        store.spawn(Vec3::ZERO);
        store.spawn(Vec3::ONE);
        assert_eq!(store.spawn(Vec3::NEG_ONE), None);
        assert_eq!(store.active_count(), 2);
        assert_eq!(store.active()[1].position, Vec3::ONE);
    }

    #[test]
    fn zero_capacity_store_rejects_everything() {
        let mut store = ParticleStore::with_capacity(0);
        assert!(store.is_full());
        assert_eq!(store.spawn(Vec3::ZERO), None);
    }

    #[test]
    fn clear_zeroes_every_slot() {
        let mut store = ParticleStore::with_capacity(4);
        for i in 0..4 {
            store.spawn(Vec3::splat(i as f32 + 1.0));
        }
        store.clear();

        assert_eq!(store.active_count(), 0);
        assert!(store.slots().iter().all(|p| *p == Particle::default()));
        assert!(store.slots().iter().all(|p| !p.is_alive()));
    }

    #[test]
    fn capacity_invariant_holds_over_mixed_calls() {
        let mut store = ParticleStore::with_capacity(5);
        for round in 0..40 {
            if round % 13 == 12 {
                store.clear();
            } else {
                store.spawn(Vec3::splat(round as f32));
            }
            assert!(store.active_count() <= store.capacity());
        }
    }
}
