//! # sw-core — the sorted sliding window
//!
//! [`SortedWindow`] keeps the last `capacity` values of a stream ordered by a
//! caller-chosen predicate, with O(1) access to minimum, median and maximum.
//!
//! The values live in an [`sw_ring::RingStore`] in insertion order, which
//! decides eviction. A doubly linked list threaded through the ring's
//! physical slots keeps them in sorted order, which answers queries.
//!
//! | Operation              | Cost                                   |
//! |------------------------|----------------------------------------|
//! | `push_back/push_front` | O(distance from median to insert point) |
//! | `pop_front/pop_back`   | O(1), or O(run of ties) when the popped value equals the median |
//! | `min/median/max`       | O(1)                                   |
//! | `set_max_size`         | full rebuild                           |

mod config;
mod error;
mod invariants;
mod iter;
mod window;

pub use config::{WindowConfig, WindowStats, DEFAULT_CAPACITY};
pub use error::{InvariantViolation, WindowError};
pub use iter::{InsertionOrder, Iter};
pub use sw_ring::{Evict, Slot};
pub use window::{natural_less, NaturalLess, SortedWindow};
