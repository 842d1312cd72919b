//! Fixed-window sample history

use std::time::Duration;

/// A value that can be averaged over a window.
pub trait Sample: Copy + Default {
    fn add(self, other: Self) -> Self;
    fn div(self, count: usize) -> Self;
}

impl Sample for Duration {
    fn add(self, other: Self) -> Self {
        self + other
    }

    fn div(self, count: usize) -> Self {
        self / count as u32
    }
}

impl Sample for f64 {
    fn add(self, other: Self) -> Self {
        self + other
    }

    fn div(self, count: usize) -> Self {
        self / count as f64
    }
}

/// Keeps the most recent `capacity` samples; older samples are overwritten.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    samples: Vec<T>,
    capacity: usize,
    /// Slot the next sample is written to once the buffer is full.
    head: usize,
}

impl<T: Sample> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.head] = sample;
        }
        self.head = (self.head + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.head = 0;
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> Option<T> {
        if self.samples.is_empty() {
            return None;
        }
        let idx = (self.head + self.capacity - 1) % self.capacity;
        self.samples.get(idx).copied()
    }

    pub fn average(&self) -> T {
        if self.samples.is_empty() {
            return T::default();
        }
        self.samples
            .iter()
            .fold(T::default(), |acc, &s| acc.add(s))
            .div(self.samples.len())
    }
}

impl RingBuffer<Duration> {
    pub fn min_max(&self) -> (Duration, Duration) {
        let min = self.samples.iter().min().copied().unwrap_or_default();
        let max = self.samples.iter().max().copied().unwrap_or_default();
        (min, max)
    }
}
