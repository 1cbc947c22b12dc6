//! Error types for hamcode core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid word width: {width} (must be 1..=64 bits)")]
    InvalidWidth { width: u32 },

    #[error("Invalid channel configuration: {msg}")]
    InvalidChannelConfig { msg: String },
}

/// Result type for hamcode core operations
pub type Result<T> = std::result::Result<T, CoreError>;
