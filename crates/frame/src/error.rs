//! Error types for hamcode frame

use thiserror::Error;

/// Codebook, codec and parity frame error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid codebook: symbols {first:#x} and {second:#x} are {distance} bits apart, minimum is {min_distance}")]
    InvalidCodebook {
        first: u32,
        second: u32,
        distance: u32,
        min_distance: u32,
    },

    #[error("Invalid codebook: {msg}")]
    InvalidTable { msg: String },

    #[error("Codebook exhausted: found {found} of {requested} codewords in the {width}-bit space")]
    CodebookExhausted { requested: usize, found: usize, width: u32 },

    #[error("Unknown symbol {symbol:#x}: codebook has {symbol_count} symbols")]
    UnknownSymbol { symbol: u32, symbol_count: usize },

    #[error("Structural mismatch in frame {frame:#010b}: fixed bit {bit} is wrong")]
    StructuralMismatch { frame: u8, bit: u32 },

    #[error("Parity mismatch in frame {frame:#010b}: expected {expected:#b}, got {actual:#b}")]
    ParityMismatch { frame: u8, expected: u8, actual: u8 },

    #[error("Value {value:#x} does not fit in {bits} bits")]
    InvalidValueRange { value: u64, bits: u32 },

    #[error("Frame size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Core error: {0}")]
    Core(#[from] hamcode_core::CoreError),
}

/// Result type for hamcode frame operations
pub type Result<T> = std::result::Result<T, FrameError>;
