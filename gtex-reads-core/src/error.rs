//! Typed failures reported by the extraction engine.
//!
//! The core never exits the process; it surfaces one of these variants and
//! leaves exit-code mapping to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// I/O error (file missing, permission denied, decompression failure)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is absent from the attribute table header.
    #[error("required column is missing from the attribute table: {column}")]
    Schema { column: String },

    /// The fixed-capacity group table has no free slot for another distinct group.
    #[error("group table capacity exceeded: {capacity} slots cannot hold another group")]
    CapacityExceeded { capacity: usize },

    /// Input the scanner cannot interpret (non-integer dimension token,
    /// non-integer count field, truncated preamble).
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// Unrecognized strategy selector, rejected before any I/O happens.
    #[error("invalid strategy selector: {selector}")]
    InvalidStrategy { selector: String },
}

impl ExtractError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
