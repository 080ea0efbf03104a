//! Structural checker for [`SortedWindow`].
//!
//! Re-derives every property from the raw links instead of trusting the
//! bookkeeping fields, so tests and proof harnesses can call it after each
//! operation.

use sw_ring::Slot;

use crate::{InvariantViolation, SortedWindow};

impl<T, L> SortedWindow<T, L>
where
    L: Fn(&T, &T) -> bool,
{
    /// Verify capacity bound, endpoint slots, link symmetry, sortedness and
    /// median rank.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let len = self.nodes.len();
        let capacity = self.nodes.capacity();
        if len > capacity {
            return Err(InvariantViolation::OverCapacity { len, capacity });
        }

        let endpoints = [("min", self.min), ("max", self.max), ("median", self.median)];
        if len == 0 {
            if let Some(&(field, _)) = endpoints.iter().find(|(_, slot)| slot.is_some()) {
                return Err(InvariantViolation::DanglingEndpoint { field });
            }
            return Ok(());
        }
        for (field, slot) in endpoints {
            if slot.is_none() {
                return Err(InvariantViolation::MissingEndpoint { field });
            }
            if self.nodes.at_physical(slot).is_none() {
                return Err(InvariantViolation::DeadSlot { field });
            }
        }

        let mut prev = Slot::NONE;
        let mut cursor = self.min;
        let mut position = 0;
        let mut median_position = None;
        while cursor.is_some() {
            if position >= len {
                return Err(InvariantViolation::LengthMismatch {
                    visited: position + 1,
                    len,
                });
            }
            let node = self
                .nodes
                .at_physical(cursor)
                .ok_or(InvariantViolation::DeadSlot { field: "chain" })?;
            if node.prev != prev {
                return Err(InvariantViolation::BrokenLink { position });
            }
            if let Some(before) = self.nodes.at_physical(prev) {
                if (self.less)(&node.value, &before.value) {
                    return Err(InvariantViolation::Unsorted { position });
                }
            }
            if cursor == self.median {
                median_position = Some(position);
            }
            prev = cursor;
            cursor = node.next;
            position += 1;
        }

        if position != len {
            return Err(InvariantViolation::LengthMismatch {
                visited: position,
                len,
            });
        }
        if prev != self.max {
            return Err(InvariantViolation::WrongMax);
        }

        let expected = (len - 1) / 2;
        if self.median_rank != expected {
            return Err(InvariantViolation::WrongMedianRank {
                rank: self.median_rank,
                expected,
            });
        }
        if median_position != Some(expected) {
            return Err(InvariantViolation::WrongMedianSlot { rank: expected });
        }
        Ok(())
    }
}
