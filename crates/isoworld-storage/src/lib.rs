//! File-backed access to an isometric world.
//!
//! This crate sits on top of `isoworld-formats` and owns everything that
//! touches the disk:
//!
//! - **Archive**: [`ArchivePack`] resolves names in a pack index and reads
//!   the matching byte range of the pack data file on demand
//! - **Segment cache**: [`SegmentCache`] keeps the map blocks around the
//!   camera decoded and drops the rest as the camera moves
//! - **Tileset cache**: [`TilesetCache`] holds the decoded tilesets that the
//!   resident blocks reference
//! - **World**: [`World`] ties the three together into a per-frame
//!   [`World::tick`]
//!
//! # Layout on disk
//!
//! ```text
//! Tile.idx                   pack index
//! Tile.pak                   pack data
//! map/<map id>/<block>.s32   one file per 64×64 block
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use isoworld_storage::{World, WorldConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WorldConfig::new("/path/to/client").with_map_id(4);
//! let mut world = World::open(config)?;
//!
//! let report = world.tick(33068, 32806);
//! println!(
//!     "{} blocks loaded, {} tilesets resident",
//!     report.segments.loaded.len(),
//!     world.tilesets().len()
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]

use thiserror::Error;

// Pack archive access
pub mod archive;

// Configuration
pub mod config;

// Draw ordering and terrain iteration
pub mod scene;

// Viewport-driven block cache
pub mod segment_cache;

// Decoded tilesets referenced by resident blocks
pub mod tileset_cache;

// Per-frame facade
mod world;

pub use archive::ArchivePack;
pub use config::{Viewport, WorldConfig};
pub use scene::{DrawItem, DrawKind, TerrainCell, collect_tile_ids, draw_list, terrain_cells};
pub use segment_cache::{
    BlockSource, CacheStats, DirectoryBlockSource, SegmentCache, UpdateReport,
};
pub use tileset_cache::{SyncReport, TilesetCache};
pub use world::{TickReport, World};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pack index could not be parsed.
    #[error("Pack index error: {0}")]
    Pack(#[from] isoworld_formats::pack::PackError),

    /// Tileset header could not be parsed.
    #[error("Tileset error: {0}")]
    Tileset(#[from] isoworld_formats::tileset::TilesetError),

    /// Map block could not be parsed.
    #[error("Segment error: {0}")]
    Segment(#[from] isoworld_formats::segment::SegmentError),

    /// Pack data file is inconsistent with its index.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
