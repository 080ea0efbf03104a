//! # Ring Store — Index-Stable Circular Buffer
//!
//! Holds up to `capacity` elements and supports pushes and pops at both
//! ends. Two addressing modes are exposed and must never be conflated:
//!
//! - **logical** ([`RingStore::at`], [`RingStore::get`]): offset from the
//!   current front. Shifts whenever the front moves.
//! - **physical** ([`RingStore::at_physical`], `store[slot]`): raw [`Slot`]
//!   number. Stable until the slot is overwritten or the store is resized.
//!
//! ```text
//!   capacity = 5, front = 3, len = 4
//!
//!   slots:  [ c  d  _  a  b ]
//!             0  1  2  3  4
//!
//!   logical 0 -> slot 3 (a)      logical 2 -> slot 0 (c)
//!   logical 1 -> slot 4 (b)      logical 3 -> slot 1 (d)
//! ```

use core::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{RingError, Slot};

/// Which end loses elements when a capacity change has to drop some.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evict {
    /// Drop the oldest elements (logical front).
    #[default]
    Front,
    /// Drop the newest elements (logical back).
    Back,
}

/// Fixed-capacity circular buffer with stable physical slots.
///
/// # Invariant
///
/// `len <= capacity`, and logical position `p` lives in physical slot
/// `(front + p) % capacity`. Every slot in that range holds `Some`, every
/// other slot holds `None`.
#[derive(Debug, Clone)]
pub struct RingStore<T> {
    slots: Vec<Option<T>>,

    /// Physical slot of logical position 0.
    front: usize,

    /// Number of live elements.
    len: usize,
}

impl<T> Default for RingStore<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T> RingStore<T> {
    /// Create an empty store. A capacity of 0 is allowed; pushes are then
    /// ignored.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            front: 0,
            len: 0,
        }
    }

    /// Drop every element and reset to an empty store of `capacity` slots.
    pub fn configure(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }

    /// Change the capacity, returning how many elements were evicted.
    ///
    /// Shrinking evicts from `evict` until the elements fit, then repacks the
    /// survivors into slots `0..len`. Growing keeps every slot in place unless
    /// the live region wraps past the old end, in which case the store is
    /// repacked the same way.
    ///
    /// Slots handed out before a resize must be re-fetched afterwards.
    pub fn resize(&mut self, new_capacity: usize, evict: Evict) -> usize {
        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return 0;
        }

        let mut evicted = 0;
        if new_capacity < old_capacity {
            while self.len > new_capacity {
                let _ = match evict {
                    Evict::Front => self.pop_front(),
                    Evict::Back => self.pop_back(),
                };
                evicted += 1;
            }
            self.repack();
            self.slots.truncate(new_capacity);
        } else {
            if self.front + self.len > old_capacity {
                self.repack();
            }
            self.slots.resize_with(new_capacity, || None);
        }

        tracing::debug!(
            old_capacity,
            new_capacity,
            evicted,
            len = self.len,
            "ring store resized"
        );
        evicted
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.front = 0;
        self.len = 0;
    }

    /// Append at the logical back, evicting the front element when full.
    ///
    /// Returns the physical slot written, or `None` when capacity is 0.
    pub fn push_back(&mut self, value: T) -> Option<Slot> {
        if self.slots.is_empty() {
            return None;
        }
        if self.is_full() {
            let _ = self.pop_front();
            tracing::trace!(capacity = self.capacity(), "ring full, evicted front");
        }
        let index = self.physical(self.len);
        self.slots[index] = Some(value);
        self.len += 1;
        Some(Slot::new(index))
    }

    /// Prepend at the logical front, evicting the back element when full.
    ///
    /// Returns the physical slot written, or `None` when capacity is 0.
    pub fn push_front(&mut self, value: T) -> Option<Slot> {
        if self.slots.is_empty() {
            return None;
        }
        if self.is_full() {
            let _ = self.pop_back();
            tracing::trace!(capacity = self.capacity(), "ring full, evicted back");
        }
        self.front = if self.front == 0 {
            self.capacity() - 1
        } else {
            self.front - 1
        };
        self.slots[self.front] = Some(value);
        self.len += 1;
        Some(Slot::new(self.front))
    }

    /// Remove the logical front element. `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity();
        self.len -= 1;
        value
    }

    /// Remove the logical back element. `None` when empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let index = self.physical(self.len - 1);
        self.len -= 1;
        self.slots[index].take()
    }

    /// Element at logical `position` (0 = front).
    pub fn at(&self, position: usize) -> Result<&T, RingError> {
        self.get(position).ok_or(RingError::OutOfRange {
            position,
            len: self.len,
        })
    }

    /// Mutable element at logical `position` (0 = front).
    pub fn at_mut(&mut self, position: usize) -> Result<&mut T, RingError> {
        let len = self.len;
        self.get_mut(position)
            .ok_or(RingError::OutOfRange { position, len })
    }

    /// Element at logical `position`, or `None` past the back.
    pub fn get(&self, position: usize) -> Option<&T> {
        if position >= self.len {
            return None;
        }
        self.slots[self.physical(position)].as_ref()
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        if position >= self.len {
            return None;
        }
        let index = self.physical(position);
        self.slots[index].as_mut()
    }

    /// Element in physical `slot`, or `None` if the slot is not live.
    #[inline]
    pub fn at_physical(&self, slot: Slot) -> Option<&T> {
        slot.get()
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
    }

    #[inline]
    pub fn at_physical_mut(&mut self, slot: Slot) -> Option<&mut T> {
        slot.get()
            .and_then(|index| self.slots.get_mut(index))
            .and_then(Option::as_mut)
    }

    /// Physical slot backing logical `position`.
    pub fn slot_of(&self, position: usize) -> Option<Slot> {
        (position < self.len).then(|| Slot::new(self.physical(position)))
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Physical slot of the front element.
    pub fn front_index(&self) -> Option<Slot> {
        self.slot_of(0)
    }

    /// Physical slot of the back element.
    pub fn back_index(&self) -> Option<Slot> {
        self.len.checked_sub(1).and_then(|last| self.slot_of(last))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Elements in logical order, front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            head: 0,
            tail: self.len,
        }
    }

    /// Map a logical position to its physical index. Requires capacity > 0.
    #[inline]
    fn physical(&self, position: usize) -> usize {
        (self.front + position) % self.capacity()
    }

    /// Move the live region to slots `0..len`.
    fn repack(&mut self) {
        if self.front != 0 {
            self.slots.rotate_left(self.front);
            self.front = 0;
        }
    }
}

impl<T> Index<Slot> for RingStore<T> {
    type Output = T;

    /// # Panics
    /// Panics if `slot` does not hold a live element.
    fn index(&self, slot: Slot) -> &T {
        match self.at_physical(slot) {
            Some(value) => value,
            None => panic!("no live element in {slot:?}"),
        }
    }
}

impl<T> IndexMut<Slot> for RingStore<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut T {
        match self.at_physical_mut(slot) {
            Some(value) => value,
            None => panic!("no live element in {slot:?}"),
        }
    }
}

/// Front-to-back iterator over a [`RingStore`].
pub struct Iter<'a, T> {
    ring: &'a RingStore<T>,
    head: usize,
    tail: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.head >= self.tail {
            return None;
        }
        let item = self.ring.get(self.head);
        self.head += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tail - self.head;
        (remaining, Some(remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.head >= self.tail {
            return None;
        }
        self.tail -= 1;
        self.ring.get(self.tail)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingStore<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// =============================================================================
// Kani Proofs: Ring Store Invariants
// =============================================================================

#[cfg(kani)]
mod proofs {
    use super::*;

    /// **Proof: length never exceeds capacity**
    ///
    /// Any interleaving of pushes and pops at both ends keeps
    /// `len <= capacity`, and the store only reports empty when `len == 0`.
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_len_bounded_by_capacity() {
        let mut ring: RingStore<u8> = RingStore::new(3);

        for _ in 0..4 {
            let op: u8 = kani::any();
            match op % 4 {
                0 => {
                    let _ = ring.push_back(kani::any());
                }
                1 => {
                    let _ = ring.push_front(kani::any());
                }
                2 => {
                    let _ = ring.pop_front();
                }
                _ => {
                    let _ = ring.pop_back();
                }
            }
            assert!(ring.len() <= ring.capacity());
            assert_eq!(ring.is_empty(), ring.len() == 0);
        }
    }

    /// **Proof: slots are stable across unrelated pushes and pops**
    ///
    /// An element's physical slot keeps addressing it while the other end of
    /// the store churns, as long as the store does not fill up.
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_slot_stability() {
        let mut ring: RingStore<u8> = RingStore::new(4);
        let _ = ring.push_back(1);
        let pinned_value: u8 = kani::any();
        let pinned = ring.push_back(pinned_value);

        let _ = ring.pop_front();
        let _ = ring.push_back(kani::any());
        let _ = ring.push_back(kani::any());

        assert_eq!(ring.at_physical(pinned.unwrap()), Some(&pinned_value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(ring: &RingStore<i32>) -> Vec<i32> {
        ring.iter().copied().collect()
    }

    #[test]
    fn test_zero_capacity_ignores_pushes() {
        let mut ring = RingStore::new(0);
        assert_eq!(ring.push_back(11), None);
        assert_eq!(ring.push_front(11), None);
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.capacity(), 0);
        assert_eq!(ring.pop_front(), None);
        assert_eq!(ring.pop_back(), None);
    }

    #[test]
    fn test_capacity_one_overwrites() {
        let mut ring = RingStore::new(1);
        ring.push_back(11);
        assert_eq!(ring.front(), Some(&11));
        assert_eq!(ring.back(), Some(&11));
        ring.push_back(22);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.front(), Some(&22));
        assert_eq!(ring.back(), Some(&22));
        assert_eq!(ring.at(0), Ok(&22));
    }

    #[test]
    fn test_push_back_evicts_front_when_full() {
        let mut ring = RingStore::new(3);
        assert!(ring.iter().next().is_none());
        for value in [11, 22, 33, 44] {
            ring.push_back(value);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(collect(&ring), vec![22, 33, 44]);
        assert_eq!(ring.iter().sum::<i32>(), 99);
    }

    #[test]
    fn test_push_front_evicts_back_when_full() {
        let mut ring = RingStore::new(3);
        for value in [22, 33, 44] {
            ring.push_back(value);
        }
        ring.push_front(55);
        assert_eq!(ring.at(0), Ok(&55));
        assert_eq!(ring.iter().next_back(), Some(&33));
        assert_eq!(collect(&ring), vec![55, 22, 33]);
    }

    #[test]
    fn test_out_of_range_logical_access() {
        let mut ring = RingStore::new(4);
        ring.push_back(1);
        assert_eq!(
            ring.at(1),
            Err(RingError::OutOfRange {
                position: 1,
                len: 1
            })
        );
        assert!(ring.at_mut(3).is_err());
        assert_eq!(ring.get(1), None);
    }

    #[test]
    fn test_physical_slots_survive_pushes_and_pops() {
        let mut ring = RingStore::new(4);
        let a = ring.push_back(1).unwrap();
        let b = ring.push_back(2).unwrap();
        let c = ring.push_front(3).unwrap();
        assert_eq!(ring[a], 1);
        assert_eq!(ring[b], 2);
        assert_eq!(ring[c], 3);
        assert_eq!(collect(&ring), vec![3, 1, 2]);

        assert_eq!(ring.pop_front(), Some(3));
        ring.push_back(4);
        assert_eq!(ring[a], 1);
        assert_eq!(ring[b], 2);
        assert_eq!(ring.at_physical(c), None);
    }

    #[test]
    fn test_front_and_back_indexes() {
        let mut ring = RingStore::new(3);
        assert_eq!(ring.front_index(), None);
        assert_eq!(ring.back_index(), None);
        let first = ring.push_back(1).unwrap();
        assert_eq!(ring.front_index(), Some(first));
        assert_eq!(ring.back_index(), Some(first));
        let front = ring.push_front(0).unwrap();
        assert_eq!(front, Slot::new(2));
        assert_eq!(ring.front_index(), Some(front));
        assert_eq!(ring.back_index(), Some(first));
        assert_eq!(ring.slot_of(1), Some(first));
    }

    #[test]
    fn test_index_mut_writes_through_slot() {
        let mut ring = RingStore::new(2);
        let slot = ring.push_back(5).unwrap();
        ring[slot] = 6;
        *ring.at_mut(0).unwrap() += 1;
        assert_eq!(ring.front(), Some(&7));
    }

    #[test]
    #[should_panic(expected = "no live element")]
    fn test_index_dead_slot_panics() {
        let mut ring = RingStore::new(2);
        let slot = ring.push_back(5).unwrap();
        ring.pop_back();
        let _value: i32 = ring[slot];
    }

    #[test]
    fn test_resize_sequence_preserves_logical_order() {
        let mut ring = RingStore::new(3);
        ring.push_back(1);
        ring.push_back(2);
        ring.push_back(3);
        ring.pop_front();

        assert_eq!(ring.resize(5, Evict::Front), 0);
        assert_eq!(collect(&ring), vec![2, 3]);

        assert_eq!(ring.resize(4, Evict::Front), 0);
        assert_eq!(collect(&ring), vec![2, 3]);

        ring.push_back(4);
        ring.push_back(5);
        assert_eq!(ring.resize(3, Evict::Front), 1);
        assert_eq!(collect(&ring), vec![3, 4, 5]);
        assert_eq!(ring.front_index(), Some(Slot::new(0)));
    }

    #[test]
    fn test_shrink_evicting_back() {
        let mut ring = RingStore::new(5);
        for value in 1..=5 {
            ring.push_back(value);
        }
        assert_eq!(ring.resize(2, Evict::Back), 3);
        assert_eq!(collect(&ring), vec![1, 2]);
        assert_eq!(ring.capacity(), 2);
    }

    #[test]
    fn test_grow_keeps_slots_when_not_wrapped() {
        let mut ring = RingStore::new(4);
        ring.push_back(1);
        let b = ring.push_back(2).unwrap();
        ring.pop_front();
        ring.resize(8, Evict::Front);
        assert_eq!(ring[b], 2);
        assert_eq!(collect(&ring), vec![2]);
    }

    #[test]
    fn test_grow_repacks_wrapped_layout() {
        let mut ring = RingStore::new(3);
        for value in [1, 2, 3, 4] {
            ring.push_back(value);
        }
        // slots: [4, 2, 3], front = 1
        ring.resize(5, Evict::Front);
        assert_eq!(collect(&ring), vec![2, 3, 4]);
        ring.push_back(5);
        ring.push_back(6);
        assert_eq!(collect(&ring), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_shrink_to_zero_empties() {
        let mut ring = RingStore::new(3);
        ring.push_back(1);
        ring.push_back(2);
        assert_eq!(ring.resize(0, Evict::Front), 2);
        assert!(ring.is_empty());
        assert_eq!(ring.push_back(3), None);
    }

    #[test]
    fn test_configure_and_clear_reset() {
        let mut ring = RingStore::new(2);
        ring.push_back(1);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 2);
        ring.push_back(2);
        ring.configure(4);
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn test_iter_is_double_ended_and_exact() {
        let mut ring = RingStore::new(4);
        for value in [1, 2, 3, 4, 5] {
            ring.push_back(value);
        }
        let iter = ring.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(ring.iter().rev().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2]);
    }
}
