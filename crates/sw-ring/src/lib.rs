//! # sw-ring — index-stable ring storage
//!
//! A fixed-capacity circular buffer whose physical slots never move while
//! elements are pushed and popped at either end. Higher layers thread their
//! own links through the store using [`Slot`] handles.

mod error;
pub mod ring;
mod slot;

pub use error::RingError;
pub use ring::{Evict, Iter, RingStore};
pub use slot::Slot;
