//! # Sorted Window — Ordered Chain over a Ring Store
//!
//! Every live ring slot holds a `Node`. The nodes' `prev`/`next` slots form
//! a doubly linked list in ascending order, independent of the ring's
//! insertion order:
//!
//! ```text
//!   ring (insertion order):   [ 75 | 37 | 83 | 92 | 59 ]
//!                               s0   s1   s2   s3   s4
//!
//!   chain (sorted order):     s1 -> s4 -> s0 -> s2 -> s3
//!                             37    59    75    83    92
//!                             min         median      max
//! ```
//!
//! # Invariant
//!
//! Whenever the window is non-empty, `median` is the node at chain rank
//! `(len - 1) / 2` (the lower median) and `median_rank` equals that rank.
//! Pushes search from the median, so a splice costs the distance between the
//! median and the insertion point, and re-centering afterwards is at most one
//! hop.

use core::fmt;

use sw_ring::{Evict, RingStore, Slot};

use crate::config::{WindowConfig, WindowStats};
use crate::iter::{InsertionOrder, Iter};
use crate::WindowError;

/// Ordering predicate used when none is supplied.
pub type NaturalLess<T> = fn(&T, &T) -> bool;

/// `a < b` under `PartialOrd`.
#[inline]
pub fn natural_less<T: PartialOrd>(a: &T, b: &T) -> bool {
    a < b
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Slot,
    pub(crate) next: Slot,
}

/// Fixed-capacity window over a stream, kept sorted by `less`.
///
/// Insertion order decides eviction: a push into a full window first removes
/// the element at the opposite end of the insertion sequence. Sorted order
/// answers [`min`](Self::min), [`median`](Self::median), [`max`](Self::max)
/// and [`iter`](Self::iter).
///
/// `less` must be a total preorder. Elements that compare equal keep the
/// order in which they were linked into the chain.
#[derive(Clone)]
pub struct SortedWindow<T, L = NaturalLess<T>> {
    pub(crate) nodes: RingStore<Node<T>>,
    pub(crate) less: L,
    pub(crate) min: Slot,
    pub(crate) max: Slot,
    pub(crate) median: Slot,
    pub(crate) median_rank: usize,
}

impl<T: PartialOrd> SortedWindow<T> {
    /// Window ordered by `T`'s natural order.
    pub fn new(capacity: usize) -> Self {
        Self::with_less(capacity, natural_less::<T>)
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(config.capacity)
    }
}

impl<T: PartialOrd> Default for SortedWindow<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T> SortedWindow<T> {
    /// Window ordered by a key extracted from each element.
    ///
    /// ```
    /// use sw_core::SortedWindow;
    ///
    /// let mut window = SortedWindow::by_key(3, |reading: &(u32, f32)| reading.0);
    /// window.push_back((30, 0.5));
    /// window.push_back((10, 0.7));
    /// window.push_back((20, 0.1));
    /// assert_eq!(window.median(), Ok(&(20, 0.1)));
    /// ```
    pub fn by_key<K, F>(capacity: usize, key: F) -> SortedWindow<T, impl Fn(&T, &T) -> bool>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        SortedWindow::with_less(capacity, move |a: &T, b: &T| key(a) < key(b))
    }
}

// =============================================================================
// Read-only surface
// =============================================================================

impl<T, L> SortedWindow<T, L> {
    /// Smallest element. `Err(Empty)` on an empty window.
    pub fn min(&self) -> Result<&T, WindowError> {
        self.value_at(self.min, "min")
    }

    /// Lower median, the element at sorted rank `(len - 1) / 2`.
    pub fn median(&self) -> Result<&T, WindowError> {
        self.value_at(self.median, "median")
    }

    /// Largest element. `Err(Empty)` on an empty window.
    pub fn max(&self) -> Result<&T, WindowError> {
        self.value_at(self.max, "max")
    }

    /// Sorted rank of the median, `None` when empty.
    pub fn median_rank(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.median_rank)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.nodes.is_full()
    }

    /// Configured capacity.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.nodes.capacity()
    }

    /// Elements in sorted order, minimum first. Use `.rev()` to walk down
    /// from the maximum.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.min, self.max)
    }

    /// Elements in insertion order, front first.
    pub fn insertion_order(&self) -> InsertionOrder<'_, T> {
        InsertionOrder::new(self.nodes.iter())
    }

    /// Snapshot of size and order statistics.
    pub fn stats(&self) -> WindowStats<T>
    where
        T: Clone,
    {
        WindowStats {
            len: self.len(),
            capacity: self.max_size(),
            min: self.min().ok().cloned(),
            median: self.median().ok().cloned(),
            max: self.max().ok().cloned(),
        }
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.reset_links();
    }

    fn value_at(&self, slot: Slot, op: &'static str) -> Result<&T, WindowError> {
        self.nodes
            .at_physical(slot)
            .map(|node| &node.value)
            .ok_or(WindowError::Empty { op })
    }

    fn reset_links(&mut self) {
        self.min = Slot::NONE;
        self.max = Slot::NONE;
        self.median = Slot::NONE;
        self.median_rank = 0;
    }
}

// =============================================================================
// Mutation
// =============================================================================

impl<T, L> SortedWindow<T, L>
where
    L: Fn(&T, &T) -> bool,
{
    /// Window ordered by a caller-supplied `less` predicate.
    pub fn with_less(capacity: usize, less: L) -> Self {
        Self {
            nodes: RingStore::new(capacity),
            less,
            min: Slot::NONE,
            max: Slot::NONE,
            median: Slot::NONE,
            median_rank: 0,
        }
    }

    /// Append `value` at the back of the insertion order.
    ///
    /// When the window is full the front element is evicted first and
    /// returned. With capacity 0 nothing is stored and `value` itself comes
    /// back.
    pub fn push_back(&mut self, value: T) -> Option<T> {
        if self.max_size() == 0 {
            return Some(value);
        }
        let mut evicted = None;
        while self.nodes.is_full() {
            evicted = self.take_front();
        }
        let Some(slot) = self.nodes.push_back(Node::detached(value)) else {
            return evicted;
        };
        self.link(slot);
        evicted
    }

    /// Prepend `value` at the front of the insertion order.
    ///
    /// When the window is full the back element is evicted first and
    /// returned. With capacity 0 nothing is stored and `value` itself comes
    /// back.
    pub fn push_front(&mut self, value: T) -> Option<T> {
        if self.max_size() == 0 {
            return Some(value);
        }
        let mut evicted = None;
        while self.nodes.is_full() {
            evicted = self.take_back();
        }
        let Some(slot) = self.nodes.push_front(Node::detached(value)) else {
            return evicted;
        };
        self.link(slot);
        evicted
    }

    /// Remove the oldest element of the insertion order.
    pub fn pop_front(&mut self) -> Result<T, WindowError> {
        self.take_front()
            .ok_or(WindowError::Empty { op: "pop_front" })
    }

    /// Remove the newest element of the insertion order.
    pub fn pop_back(&mut self) -> Result<T, WindowError> {
        self.take_back().ok_or(WindowError::Empty { op: "pop_back" })
    }

    /// Change the capacity by draining and replaying the window.
    ///
    /// Elements beyond the new capacity are dropped from the `evict` end and
    /// returned in insertion order. The rest are pushed back in insertion
    /// order, so every invariant is re-established by the regular push path.
    pub fn set_max_size(&mut self, capacity: usize, evict: Evict) -> Vec<T> {
        if capacity == self.max_size() {
            return Vec::new();
        }

        let mut retained = Vec::with_capacity(self.len());
        while let Some(node) = self.nodes.pop_front() {
            retained.push(node.value);
        }
        self.reset_links();

        let excess = retained.len().saturating_sub(capacity);
        let evicted: Vec<T> = match evict {
            Evict::Front => retained.drain(..excess).collect(),
            Evict::Back => retained.split_off(retained.len() - excess),
        };

        self.nodes.configure(capacity);
        for value in retained {
            self.push_back(value);
        }

        tracing::debug!(
            capacity,
            evicted = evicted.len(),
            len = self.len(),
            "window rebuilt"
        );
        evicted
    }

    /// Apply the capacity and eviction policy of `config`.
    pub fn apply_config(&mut self, config: &WindowConfig) -> Vec<T> {
        self.set_max_size(config.capacity, config.evict)
    }

    fn take_front(&mut self) -> Option<T> {
        let slot = self.nodes.front_index()?;
        let node = self.nodes.pop_front()?;
        self.unlink(slot, &node);
        tracing::trace!(len = self.len(), "removed front element");
        Some(node.value)
    }

    fn take_back(&mut self) -> Option<T> {
        let slot = self.nodes.back_index()?;
        let node = self.nodes.pop_back()?;
        self.unlink(slot, &node);
        tracing::trace!(len = self.len(), "removed back element");
        Some(node.value)
    }

    /// Splice a freshly stored node into the chain and re-center the median.
    fn link(&mut self, slot: Slot) {
        if self.median.is_none() {
            self.min = slot;
            self.max = slot;
            self.median = slot;
            self.median_rank = 0;
            return;
        }

        if self.less_at(slot, self.median) {
            // Lands below the median, which moves up one rank.
            self.median_rank += 1;
            let mut cursor = self.median;
            loop {
                let prev = self.nodes[cursor].prev;
                if prev.is_none() {
                    self.splice(Slot::NONE, slot, cursor);
                    self.min = slot;
                    break;
                }
                if !self.less_at(slot, prev) {
                    self.splice(prev, slot, cursor);
                    break;
                }
                cursor = prev;
            }
        } else {
            let mut cursor = self.median;
            loop {
                let next = self.nodes[cursor].next;
                if next.is_none() {
                    self.splice(cursor, slot, Slot::NONE);
                    self.max = slot;
                    break;
                }
                if self.less_at(slot, next) {
                    self.splice(cursor, slot, next);
                    break;
                }
                cursor = next;
            }
        }

        self.recenter();
    }

    /// Detach `removed`, already popped from the ring, from the chain.
    fn unlink(&mut self, slot: Slot, removed: &Node<T>) {
        if self.nodes.is_empty() {
            self.reset_links();
            return;
        }

        if slot == self.median {
            if removed.next.is_some() {
                self.median = removed.next;
            } else {
                self.median = removed.prev;
                self.median_rank -= 1;
            }
        } else if self.precedes_median(slot, &removed.value) {
            self.median_rank -= 1;
        }

        if removed.prev.is_some() {
            self.nodes[removed.prev].next = removed.next;
        } else {
            self.min = removed.next;
        }
        if removed.next.is_some() {
            self.nodes[removed.next].prev = removed.prev;
        } else {
            self.max = removed.prev;
        }

        self.recenter();
    }

    /// Whether `slot` (still linked) sits below the median in the chain.
    ///
    /// Equal elements are contiguous, so a tie is settled by scanning the run
    /// of elements equal to the median toward the minimum. That scan costs
    /// O(length of the run), which is O(n) for a constant signal.
    fn precedes_median(&self, slot: Slot, value: &T) -> bool {
        let median = &self.nodes[self.median];
        if (self.less)(value, &median.value) {
            return true;
        }
        if (self.less)(&median.value, value) {
            return false;
        }

        let mut cursor = median.prev;
        while cursor.is_some() {
            if cursor == slot {
                return true;
            }
            let node = &self.nodes[cursor];
            if (self.less)(&node.value, &median.value) {
                return false;
            }
            cursor = node.prev;
        }
        false
    }

    /// Walk the median to rank `(len - 1) / 2`.
    fn recenter(&mut self) {
        let Some(last) = self.len().checked_sub(1) else {
            return;
        };
        let target = last / 2;
        while self.median_rank > target {
            self.median = self.nodes[self.median].prev;
            self.median_rank -= 1;
        }
        while self.median_rank < target {
            self.median = self.nodes[self.median].next;
            self.median_rank += 1;
        }
    }

    fn splice(&mut self, prev: Slot, slot: Slot, next: Slot) {
        let node = &mut self.nodes[slot];
        node.prev = prev;
        node.next = next;
        if prev.is_some() {
            self.nodes[prev].next = slot;
        }
        if next.is_some() {
            self.nodes[next].prev = slot;
        }
    }

    #[inline]
    fn less_at(&self, a: Slot, b: Slot) -> bool {
        (self.less)(&self.nodes[a].value, &self.nodes[b].value)
    }
}

impl<T> Node<T> {
    fn detached(value: T) -> Self {
        Self {
            value,
            prev: Slot::NONE,
            next: Slot::NONE,
        }
    }
}

impl<T, L> Extend<T> for SortedWindow<T, L>
where
    L: Fn(&T, &T) -> bool,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T, L> IntoIterator for &'a SortedWindow<T, L> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Debug, L> fmt::Debug for SortedWindow<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedWindow")
            .field("capacity", &self.max_size())
            .field("sorted", &self.iter().collect::<Vec<_>>())
            .field("median_rank", &self.median_rank())
            .finish()
    }
}
