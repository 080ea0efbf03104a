//! Brute-force mirror of a sorted window.

use std::cmp::Ordering;
use std::collections::VecDeque;

use sw_ring::Evict;

struct Entry<T> {
    /// Link order. Equal elements sort by it, matching the window's chain.
    seq: u64,
    value: T,
}

/// Same eviction semantics as [`SortedWindow`](sw_core::SortedWindow), but
/// order statistics are computed by sorting a copy on every query.
pub struct MirrorWindow<T> {
    entries: VecDeque<Entry<T>>,
    capacity: usize,
    next_seq: u64,
}

impl<T> MirrorWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
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

    pub fn push_back(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.pop_front()
        } else {
            None
        };
        let seq = self.bump();
        self.entries.push_back(Entry { seq, value });
        evicted
    }

    pub fn push_front(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.pop_back()
        } else {
            None
        };
        let seq = self.bump();
        self.entries.push_front(Entry { seq, value });
        evicted
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.entries.pop_front().map(|entry| entry.value)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.entries.pop_back().map(|entry| entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Resize, re-linking survivors in insertion order like the window does.
    pub fn set_max_size(&mut self, capacity: usize, evict: Evict) -> Vec<T> {
        if capacity == self.capacity {
            return Vec::new();
        }
        let mut retained: Vec<T> = self.entries.drain(..).map(|entry| entry.value).collect();
        let excess = retained.len().saturating_sub(capacity);
        let evicted: Vec<T> = match evict {
            Evict::Front => retained.drain(..excess).collect(),
            Evict::Back => retained.split_off(retained.len() - excess),
        };

        self.capacity = capacity;
        for value in retained {
            self.push_back(value);
        }
        evicted
    }

    /// Elements in insertion order.
    pub fn insertion_order(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Elements sorted by `less`, ties broken by link order.
    pub fn sorted<L>(&self, less: L) -> Vec<&T>
    where
        L: Fn(&T, &T) -> bool,
    {
        let mut entries: Vec<&Entry<T>> = self.entries.iter().collect();
        entries.sort_by(|a, b| {
            if less(&a.value, &b.value) {
                Ordering::Less
            } else if less(&b.value, &a.value) {
                Ordering::Greater
            } else {
                a.seq.cmp(&b.seq)
            }
        });
        entries.into_iter().map(|entry| &entry.value).collect()
    }

    /// Lower median under `less`.
    pub fn median<L>(&self, less: L) -> Option<&T>
    where
        L: Fn(&T, &T) -> bool,
    {
        let sorted = self.sorted(less);
        let rank = sorted.len().checked_sub(1)? / 2;
        sorted.get(rank).copied()
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
