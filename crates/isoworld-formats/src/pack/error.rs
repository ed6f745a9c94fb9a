//! Error types for pack index parsing

use thiserror::Error;

/// Errors that can occur when parsing a pack index
#[derive(Error, Debug)]
pub enum PackError {
    /// The index is shorter than its entry count requires
    #[error("Truncated pack index: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the declared entry count
        expected: u64,
        /// Bytes actually available
        actual: u64,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRW` parsing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for pack operation results
pub type Result<T> = std::result::Result<T, PackError>;
