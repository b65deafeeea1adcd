//! Bounded Ring Buffer
//!
//! Fixed-capacity storage that evicts the oldest entry once full. Used for
//! the rolling reading history and the capped alert log.

mod buffer;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
