//! Time-keyed priority buffer
//!
//! Holds in-flight records ordered by simulated elapsed time. Buffers stay
//! small (bounded by the triggers in flight across sources), so entries
//! live in a sorted `Vec` stored in *descending* key order: the minimum
//! sits at the end and `pop` is O(1), insertion is a binary search plus a
//! shift.
//!
//! Tie-break: among entries with exactly equal keys, the most recently
//! inserted one is popped first (last-in-first-out on ties).

use std::cmp::Ordering;

use crate::{MixError, MixResult};

/// A buffered value and its priority key
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<T> {
    pub key: f64,
    pub value: T,
}

/// Ordered container keyed by `f64` time
#[derive(Clone, Debug)]
pub struct PriorityBuffer<T> {
    /// Sorted by key, largest first
    entries: Vec<Entry<T>>,
}

impl<T> PriorityBuffer<T> {
    /// Create a new, empty buffer
    pub fn new() -> Self {
        PriorityBuffer {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PriorityBuffer {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an entry, keeping ascending pop order.
    /// Keys compare with `f64::total_cmp`.
    pub fn insert(&mut self, key: f64, value: T) {
        // Everything >= key stays in front, so the new entry lands closer to
        // the pop end than any existing entry with the same key.
        let index = self
            .entries
            .partition_point(|e| e.key.total_cmp(&key) != Ordering::Less);
        self.entries.insert(index, Entry { key, value });
    }

    /// Remove and return the minimum-key entry
    pub fn pop(&mut self) -> MixResult<Entry<T>> {
        self.entries.pop().ok_or(MixError::EmptyBuffer)
    }

    /// The `index`-th entry in ascending order, without removing it
    pub fn peek(&self, index: usize) -> Option<&Entry<T>> {
        let position = self.entries.len().checked_sub(index.checked_add(1)?)?;
        self.entries.get(position)
    }

    /// Smallest buffered key
    #[inline]
    pub fn min_key(&self) -> Option<f64> {
        self.entries.last().map(|e| e.key)
    }

    /// Largest buffered key
    #[inline]
    pub fn max_key(&self) -> Option<f64> {
        self.entries.first().map(|e| e.key)
    }

    /// Add `delta` to every key. Relative order and gaps are unchanged.
    pub fn shift_all_keys(&mut self, delta: f64) {
        for entry in &mut self.entries {
            entry.key += delta;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter().rev()
    }
}

impl<T> Default for PriorityBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
