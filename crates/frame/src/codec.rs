//! Codeword encoder and nearest-neighbour decoder
//!
//! Decoding picks the codeword with the smallest Hamming distance to the
//! received word. Ties go to the lowest symbol, and an exact match stops
//! the search early.
//!
//! With a codebook of minimum distance `D_min`, recovery is guaranteed only
//! while the channel flips fewer than `D_min / 2` bits of a word. Past that
//! bound the decoder still answers, but the answer may be silently wrong;
//! [`Decoded::within_bound`] tells the caller which case applies.

use crate::codebook::Codebook;
use crate::{FrameError, Result, Symbol};
use hamcode_core::metric::hamming_distance;
use hamcode_core::Word;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// Symbol to codeword mapping
pub trait SymbolEncoder {
    /// Encode one symbol
    fn encode(&self, symbol: Symbol) -> Result<Word>;

    /// Width of produced codewords in bits
    fn word_width(&self) -> u32;

    /// Encode a sequence of symbols, stopping at the first unknown one
    fn encode_all(&self, symbols: &[Symbol]) -> Result<Vec<Word>> {
        symbols.iter().map(|&symbol| self.encode(symbol)).collect()
    }
}

/// Received word to symbol mapping
pub trait SymbolDecoder {
    /// Nearest symbol with its distance
    fn decode_detailed(&self, received: Word) -> Decoded;

    /// Nearest symbol
    fn decode(&self, received: Word) -> Symbol {
        self.decode_detailed(received).symbol
    }

    /// Decode a sequence of received words
    fn decode_all(&self, received: &[Word]) -> Vec<Symbol> {
        received.iter().map(|&word| self.decode(word)).collect()
    }
}

/// Outcome of a nearest-neighbour search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decoded {
    /// Closest symbol, lowest value on ties
    pub symbol: Symbol,
    /// Hamming distance from the received word to that symbol's codeword
    pub distance: u32,
    /// True if `distance` is within the codebook's correction guarantee
    pub within_bound: bool,
}

/// Look up the codeword for `symbol`
pub fn encode(symbol: Symbol, codebook: &Codebook) -> Result<Word> {
    codebook.codeword(symbol).ok_or(FrameError::UnknownSymbol {
        symbol,
        symbol_count: codebook.len(),
    })
}

/// Find the symbol whose codeword is closest to `received`
pub fn decode(received: Word, codebook: &Codebook) -> Decoded {
    let width = codebook.width();
    let mut symbol = 0;
    let mut distance = u32::MAX;

    for (candidate, word) in codebook.iter() {
        let d = hamming_distance(received, word, width);
        // Strict comparison keeps the lowest symbol on ties
        if d < distance {
            symbol = candidate;
            distance = d;
            if d == 0 {
                break;
            }
        }
    }

    let within_bound = distance <= codebook.correctable_errors();
    trace!(
        "Decoded {:#x} as symbol {:#x} at distance {}",
        received,
        symbol,
        distance
    );

    Decoded {
        symbol,
        distance,
        within_bound,
    }
}

/// Encoder holding a shared codebook
#[derive(Debug, Clone)]
pub struct CodewordEncoder {
    codebook: Arc<Codebook>,
}

impl CodewordEncoder {
    /// Create a new encoder
    pub fn new(codebook: Arc<Codebook>) -> Self {
        Self { codebook }
    }

    /// Get the codebook
    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }
}

impl SymbolEncoder for CodewordEncoder {
    fn encode(&self, symbol: Symbol) -> Result<Word> {
        encode(symbol, &self.codebook)
    }

    fn word_width(&self) -> u32 {
        self.codebook.width()
    }
}

/// Decoder holding a shared codebook
#[derive(Debug, Clone)]
pub struct CodewordDecoder {
    codebook: Arc<Codebook>,
}

impl CodewordDecoder {
    /// Create a new decoder
    pub fn new(codebook: Arc<Codebook>) -> Self {
        Self { codebook }
    }

    /// Get the codebook
    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }
}

impl SymbolDecoder for CodewordDecoder {
    fn decode_detailed(&self, received: Word) -> Decoded {
        decode(received, &self.codebook)
    }
}

/// Encoder and decoder over a borrowed codebook
#[derive(Debug, Clone, Copy)]
pub struct CodewordCodec<'a> {
    codebook: &'a Codebook,
}

impl<'a> CodewordCodec<'a> {
    /// Create a new codec
    pub fn new(codebook: &'a Codebook) -> Self {
        Self { codebook }
    }

    /// Get the codebook
    pub fn codebook(&self) -> &'a Codebook {
        self.codebook
    }
}

impl SymbolEncoder for CodewordCodec<'_> {
    fn encode(&self, symbol: Symbol) -> Result<Word> {
        encode(symbol, self.codebook)
    }

    fn word_width(&self) -> u32 {
        self.codebook.width()
    }
}

impl SymbolDecoder for CodewordCodec<'_> {
    fn decode_detailed(&self, received: Word) -> Decoded {
        decode(received, self.codebook)
    }
}
