//! Ring Buffer Implementation

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Default buffer capacity (60 readings = 3 min at one reading per 3 s)
pub const DEFAULT_CAPACITY: usize = 60;

/// Fixed-capacity FIFO ring buffer
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Storage, grows up to `capacity` then is overwritten in place
    storage: Vec<T>,
    /// Capacity of the buffer
    capacity: usize,
    /// Next write position once full; also the oldest entry
    head: usize,
    /// Total items pushed (for statistics)
    total_written: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Ring buffer capacity must be > 0");
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_written: 0,
        }
    }

    /// Create a buffer with default capacity (60 entries)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push an item, returning the evicted oldest item if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        self.total_written += 1;

        if self.storage.len() < self.capacity {
            self.storage.push(item);
            self.head = self.storage.len() % self.capacity;
            None
        } else {
            let evicted = std::mem::replace(&mut self.storage[self.head], item);
            self.head = (self.head + 1) % self.capacity;
            Some(evicted)
        }
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.len() as f64 / self.capacity as f64
    }

    /// Iterate oldest to newest. Reverse it for newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        let (newer, older) = self.storage.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn oldest(&self) -> Option<&T> {
        self.iter().next()
    }

    pub fn newest(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Read the last N items (most recent first)
    pub fn read_last(&self, count: usize) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().rev().take(count).cloned().collect()
    }

    /// Copy out all items, oldest first
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Get total items pushed (for statistics)
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = 0;
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

/// Serialized as a sequence, oldest first
impl<T: Serialize> Serialize for RingBuffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self.iter() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}
