//! hamcode core - bit metrics and channel simulation
//!
//! This crate provides the Hamming distance primitives shared by every
//! codec in the workspace, plus a bounded-noise channel that flips bits
//! inside fixed-size sub-blocks of a word.

pub mod metric;
pub mod channel;
pub mod error;

pub use error::{CoreError, Result};

/// Fixed-width bit pattern. Only the low `width` bits are meaningful.
pub type Word = u64;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        metric::{hamming_distance, popcount, parity, mask, check_width, MAX_WIDTH},
        channel::{ChannelConfig, ChannelSimulator, FlipCount, NoisyWord, BoundCheck},
        error::{CoreError, Result},
        Word,
    };
}
