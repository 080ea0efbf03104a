//! Read-only traversal. Both iterators borrow the window, so any mutation
//! ends them.

use core::iter::FusedIterator;

use sw_ring::{RingStore, Slot};

use crate::window::Node;

/// Sorted-order iterator, minimum to maximum (or reversed).
pub struct Iter<'a, T> {
    nodes: &'a RingStore<Node<T>>,
    head: Slot,
    tail: Slot,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a RingStore<Node<T>>, min: Slot, max: Slot) -> Self {
        Self {
            nodes,
            head: min,
            tail: max,
            remaining: nodes.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.at_physical(self.head)?;
        self.head = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.at_physical(self.tail)?;
        self.tail = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Insertion-order iterator, oldest (front) first.
pub struct InsertionOrder<'a, T> {
    inner: sw_ring::Iter<'a, Node<T>>,
}

impl<'a, T> InsertionOrder<'a, T> {
    pub(crate) fn new(inner: sw_ring::Iter<'a, Node<T>>) -> Self {
        Self { inner }
    }
}

impl<'a, T> Iterator for InsertionOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|node| &node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for InsertionOrder<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back().map(|node| &node.value)
    }
}

impl<T> ExactSizeIterator for InsertionOrder<'_, T> {}
