//! Error types for map segment parsing

use std::fmt;
use thiserror::Error;

/// Sections of a segment file, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// 64×128 packed terrain references
    Terrain,
    /// Ground decoration count and records
    Decorations,
    /// 64×128 attribute flags
    Attributes,
    /// Object count, headers and tile records
    Objects,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Terrain => "terrain",
            Self::Decorations => "decorations",
            Self::Attributes => "attributes",
            Self::Objects => "objects",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when parsing a map segment
#[derive(Error, Debug)]
pub enum SegmentError {
    /// A section ended before its declared or fixed length
    #[error("Truncated {section} section at byte {offset}")]
    Truncated {
        /// Section being read
        section: Section,
        /// Position where the data ran out
        offset: u64,
    },

    /// `BinRW` parsing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for segment operation results
pub type Result<T> = std::result::Result<T, SegmentError>;
