//! hamcode frame - codebooks, nearest-neighbour decoding and parity frames
//!
//! This crate maps small symbols onto distance-separated codewords,
//! decodes received words to the nearest codeword, and packs 12-bit
//! values into parity-checked single-byte frames.

pub mod codebook;
pub mod codec;
pub mod parity;
pub mod error;

pub use error::{FrameError, Result};

/// Symbol index into a codebook
pub type Symbol = u32;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        codebook::{Codebook, Violation},
        codec::{
            CodewordCodec, CodewordDecoder, CodewordEncoder, Decoded, SymbolDecoder,
            SymbolEncoder,
        },
        parity::{
            decode_frame, decode_value12, decode_values, encode_frame, encode_value12,
            encode_values, ParityFrame, ParityLayout,
        },
        error::{FrameError, Result},
        Symbol,
    };
    pub use hamcode_core::Word;
}
