//! # sw-verify — checking the window against the obvious answer
//!
//! [`MirrorWindow`] keeps the same elements as a
//! [`SortedWindow`](sw_core::SortedWindow) in a plain deque and sorts them on
//! demand. [`replay`] drives both through the same operations and reports the
//! first [`Divergence`]. The property tests in `tests/` and the `sw check`
//! command are built on it.
//!
//! Under `cfg(kani)` the crate also carries proof harnesses that explore
//! every small input exhaustively. Run them with
//! `cargo kani --package sw-verify`.

mod oracle;
mod random;
mod replay;

pub use oracle::MirrorWindow;
pub use random::random_ops;
pub use replay::{replay, Divergence, DivergenceKind, Op, ReplayReport};

// =============================================================================
// Kani Proofs: Sorted Window Invariants
// =============================================================================

#[cfg(kani)]
mod proofs {
    use sw_core::{SortedWindow, WindowError};

    /// **Proof: median of the last three pushes**
    ///
    /// For any four values pushed into a window of capacity 3, the chain
    /// stays well formed after every push and the reported median is the
    /// middle of the three retained values.
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_median_after_pushes() {
        let values: [u8; 4] = kani::any();
        let mut window = SortedWindow::new(3);

        for value in values {
            let _ = window.push_back(value);
            assert!(window.check_invariants().is_ok());
        }

        let mut retained = [values[1], values[2], values[3]];
        retained.sort();
        assert_eq!(window.min(), Ok(&retained[0]));
        assert_eq!(window.median(), Ok(&retained[1]));
        assert_eq!(window.max(), Ok(&retained[2]));
    }

    /// **Proof: pops from either end keep the chain intact**
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_pops_keep_invariants() {
        let values: [u8; 4] = kani::any();
        let mut window = SortedWindow::new(4);
        for value in values {
            let _ = window.push_back(value);
        }

        for _ in 0..4 {
            let from_front: bool = kani::any();
            let popped = if from_front {
                window.pop_front()
            } else {
                window.pop_back()
            };
            assert!(popped.is_ok());
            assert!(window.check_invariants().is_ok());
        }
        assert!(window.is_empty());
    }

    /// **Proof: an empty window refuses queries and pops**
    #[kani::proof]
    fn verify_empty_window_errors() {
        let mut window: SortedWindow<u8> = SortedWindow::new(kani::any::<u8>() as usize % 4);
        assert!(matches!(window.min(), Err(WindowError::Empty { .. })));
        assert!(matches!(window.median(), Err(WindowError::Empty { .. })));
        assert!(matches!(window.max(), Err(WindowError::Empty { .. })));
        assert!(window.pop_front().is_err());
        assert!(window.pop_back().is_err());
        assert!(window.is_empty());
    }
}
