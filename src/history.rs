//! Bounded, insertion-ordered rolling buffers
//!
//! Used for the probability history, the spot-price history of the
//! divergence processor and the candle series of the indicator path.
//! Length never exceeds the capacity; the oldest entry is evicted first.

use serde::Serialize;
use std::collections::VecDeque;

pub const PROBABILITY_HISTORY_CAP: usize = 100;
pub const SPOT_HISTORY_CAP: usize = 10;
pub const CANDLE_SERIES_CAP: usize = 500;

#[derive(Debug, Clone, Serialize)]
pub struct RollingHistory<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> RollingHistory<T> {
    /// Create an empty buffer. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an entry, evicting the oldest beyond capacity
    pub fn push(&mut self, value: T) {
        self.entries.push_back(value);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Entry `n` positions back from the newest (0 = newest)
    pub fn back(&self, n: usize) -> Option<&T> {
        let len = self.entries.len();
        if n >= len {
            return None;
        }
        self.entries.get(len - 1 - n)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }
}

impl<T: Clone> RollingHistory<T> {
    /// The last `n` entries in chronological order
    pub fn tail(&self, n: usize) -> Vec<T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> Extend<T> for RollingHistory<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
