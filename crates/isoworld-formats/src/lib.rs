//! Read-only parsers for the isometric world asset formats
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Block coordinates are signed
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::derive_partial_eq_without_eq)] // Binary format structs
//! This crate decodes the three binary formats of the world client:
//!
//! - **Pack**: fixed-record index (`.idx`) mapping names to byte ranges of a
//!   flat data file (`.pak`)
//! - **Tileset**: `.til` blobs holding an ordered sequence of 24×48 RGB555
//!   pixel grids, each either a diamond-shaped mirrored tile or a
//!   run-length encoded sprite
//! - **Segment**: `.s32` map blocks covering 64×64 world tiles with terrain,
//!   ground decorations, attribute flags and objects
//!
//! Every parser works on an in-memory byte slice; reading files from disk is
//! left to `isoworld-storage`. All multi-byte integers are little-endian.
//!
//! # Example
//!
//! ```rust,no_run
//! use isoworld_formats::pack::PackIndex;
//! use isoworld_formats::tileset::TileSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = PackIndex::parse(&std::fs::read("Tile.idx")?)?;
//! if let Some(entry) = index.get("1.TIL") {
//!     println!("{} at {} ({} bytes)", entry.name, entry.offset, entry.size);
//! }
//!
//! let tileset = TileSet::parse(&std::fs::read("1.til")?)?;
//! println!("{} tiles, {} failed", tileset.len(), tileset.failures().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Pack index parsing (`.idx` files)
///
/// A pack is a pair of files: the index lists fixed 28-byte records of
/// `{offset, name, size}` and the data file is a flat blob addressed by
/// those records. Names are matched case-insensitively.
pub mod pack;
/// Map segment parsing (`.s32` block files)
///
/// See the [`segment`] module for the section layout and the block file
/// naming scheme.
pub mod segment;
/// Tileset parsing (`.til` blobs)
///
/// See the [`tileset`] module for both tile encodings.
pub mod tileset;

mod packed;

pub use packed::PackedTileRef;
