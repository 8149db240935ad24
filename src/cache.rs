//! Ring cache — fixed-capacity, most-recent-first view of accepted events.
//!
//! ```text
//!   push(r) ──▶ [ r | c0 | c1 | ... | cN-2 ] ──▶ cN-1 evicted
//!               index 0 = latest
//! ```
//!
//! The cache is never the source of truth.  After any mutation that
//! rewrites existing rows the owner rebuilds it from the log tail with
//! [`RingCache::rebuild_from`].

use std::collections::VecDeque;

use log::debug;

use crate::record::EventRecord;

#[derive(Debug, Clone)]
pub struct RingCache {
    slots: VecDeque<EventRecord>,
    capacity: usize,
}

impl RingCache {
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert `record` at index 0, evicting the oldest entry when full.
    pub fn push(&mut self, record: EventRecord) {
        if self.slots.len() == self.capacity {
            self.slots.pop_back();
        }
        self.slots.push_front(record);
    }

    /// Replace the contents from a chronological (oldest first) sequence.
    /// Only the newest `capacity` records are kept.
    pub fn rebuild_from<I>(&mut self, chronological: I)
    where
        I: IntoIterator<Item = EventRecord>,
    {
        self.slots.clear();
        for record in chronological {
            self.push(record);
        }
        debug!("Cache: rebuilt with {} record(s)", self.slots.len());
    }

    /// Record at `index`, 0 = latest.
    pub fn get(&self, index: usize) -> Option<&EventRecord> {
        self.slots.get(index)
    }

    pub fn latest(&self) -> Option<&EventRecord> {
        self.slots.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copy, newest first.
    pub fn to_vec(&self) -> Vec<EventRecord> {
        self.slots.iter().cloned().collect()
    }
}
