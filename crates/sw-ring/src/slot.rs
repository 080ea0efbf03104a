use core::fmt;

/// Physical slot number inside a [`RingStore`](crate::RingStore).
///
/// A slot stays bound to the same element until that element is popped, the
/// slot is overwritten by a later push, or the store is resized. It is NOT a
/// logical position and does not shift when other elements come and go.
///
/// [`Slot::NONE`] is reserved as the null link. A store can never hold
/// `usize::MAX` elements, so the sentinel never names a real slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(usize);

impl Slot {
    /// The null slot.
    pub const NONE: Slot = Slot(usize::MAX);

    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index, or `None` for [`Slot::NONE`].
    #[inline]
    pub const fn get(self) -> Option<usize> {
        if self.is_none() {
            None
        } else {
            Some(self.0)
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == usize::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(index) => write!(f, "Slot({index})"),
            None => f.write_str("Slot(NONE)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_not_a_valid_index() {
        assert!(Slot::NONE.is_none());
        assert_eq!(Slot::NONE.get(), None);
        assert_eq!(Slot::default(), Slot::NONE);
    }

    #[test]
    fn test_real_slot_round_trips_index() {
        let slot = Slot::new(7);
        assert!(slot.is_some());
        assert_eq!(slot.get(), Some(7));
        assert_eq!(format!("{slot:?}"), "Slot(7)");
    }
}
