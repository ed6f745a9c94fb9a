//! Map segment format
//!
//! The world is split into 64×64 tile blocks, one `.s32` file per block,
//! stored under `<map root>/<map id>/`. The file name encodes the block
//! position: `(x >> 6) + 0x7e00` and `(y >> 6) + 0x7e00`, each as four
//! lowercase hex digits, then `.s32`.
//!
//! # Binary Layout
//!
//! Every map column is split into two half-columns, so the grids below are
//! 64 rows of 128 cells.
//!
//! ```text
//! u32 terrain[64 * 128]          // packed tile references
//! u16 decoration_count
//! decoration_count × { u8 half_x, u8 y, u32 tile }
//! u16 attributes[64 * 128]
//! u32 object_count
//! object_count × {
//!     u16 index                  // ignored
//!     u16 tile_count
//!     tile_count × {
//!         u8 x, u8 y
//!         if x == 205 && y == 205 { u8 padding[5] }
//!         else                    { u8 height, u32 tile }
//!     }
//! }
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use isoworld_formats::segment::{BlockCoord, MapSegment};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let block = BlockCoord::containing(33068, 32806);
//! let name = block.file_name().expect("block is addressable");
//! let data = std::fs::read(format!("map/4/{name}"))?;
//!
//! let segment = MapSegment::parse(&data, 4, block.x(), block.y())?;
//! println!(
//!     "{} decorations, {} objects, {} tilesets",
//!     segment.decoration_count(),
//!     segment.objects().len(),
//!     segment.tile_ids().len()
//! );
//! # Ok(())
//! # }
//! ```

mod coord;
mod error;
mod map;

pub use coord::{BLOCK_FILE_EXTENSION, BLOCK_NAME_BIAS, BLOCK_SIZE, BlockCoord};
pub use error::{Result, Section, SegmentError};
pub use map::{
    Decoration, HALF_COLUMNS, MapObject, MapSegment, OBJECT_PADDING_MARKER, ObjectTile,
    SEGMENT_CELLS, SEGMENT_COLUMNS, SEGMENT_ROWS,
};
