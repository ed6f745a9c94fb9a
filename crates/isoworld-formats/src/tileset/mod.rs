//! Tileset format
//!
//! A tileset blob (`N.til`) holds an ordered list of tiles. Every tile
//! decodes to the same 24×48 RGB555 [`PixelGrid`], whichever of the two
//! encodings it uses.
//!
//! # Binary Layout
//!
//! ```text
//! u16 tile_count
//! u16 reserved
//! u32 offsets[tile_count]   // relative to the end of this header
//! u32 reserved
//! tile records...
//! ```
//!
//! Each tile record starts with a flag byte. Bit 1 selects the encoding:
//!
//! - **Standard** (bit clear): 288 u16 samples forming the left half of a
//!   diamond, mirrored about column 24. Row `r` is `standard_row_width(r)`
//!   samples wide.
//! - **Sprite** (bit set): origin x, origin y, an unused width byte and a
//!   row count, followed per row by a segment count and segments of
//!   `{skip * 2, width, samples[width]}`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use isoworld_formats::tileset::TileSet;
//! use isoworld_formats::PackedTileRef;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tile = PackedTileRef::new(0x0000_0103);
//! let data = std::fs::read(tile.tileset_name())?;
//! let set = TileSet::parse(&data)?;
//!
//! if let Some(grid) = set.get(usize::from(tile.subtile())) {
//!     println!("{} opaque samples", grid.opaque_count());
//! }
//! for failure in set.failures() {
//!     eprintln!("tile {} skipped: {}", failure.index, failure.error);
//! }
//! # Ok(())
//! # }
//! ```

mod decode;
mod error;
mod grid;
mod header;
mod set;

pub use decode::{
    SPRITE_FLAG, STANDARD_SAMPLE_COUNT, TileEncoding, decode_tile, standard_row_width,
};
pub use error::{Result, TileError, TilesetError};
pub use grid::{PixelGrid, TILE_CENTER, TILE_HEIGHT, TILE_WIDTH, rgb555_channels};
pub use header::TilesetHeader;
pub use set::{DecodedTile, TileFailure, TileSet};
