//! Error types for tileset parsing

use thiserror::Error;

/// Errors that make a whole tileset blob unreadable
#[derive(Error, Debug)]
pub enum TilesetError {
    /// The blob ends inside the header or offset table
    #[error("Truncated tileset header: {available} bytes available")]
    TruncatedHeader {
        /// Total size of the blob
        available: usize,
    },

    /// `BinRW` parsing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Errors scoped to a single tile record
///
/// A failed tile does not affect its neighbours; see
/// [`TileSet::failures`](crate::tileset::TileSet::failures).
#[derive(Error, Debug)]
pub enum TileError {
    /// The blob ends inside the tile record starting at `offset`
    #[error("Truncated tile record at byte {offset}")]
    Truncated {
        /// Absolute position of the tile's flag byte
        offset: u64,
    },

    /// A standard tile did not consume exactly its sample budget
    #[error("Standard tile sample count mismatch: expected {expected}, consumed {actual}")]
    SampleCount {
        /// Samples stored in a standard tile record
        expected: usize,
        /// Samples placed by the row geometry
        actual: usize,
    },

    /// `BinRW` parsing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for tileset operation results
pub type Result<T> = std::result::Result<T, TilesetError>;
