//! Per-frame world facade

use crate::archive::ArchivePack;
use crate::config::WorldConfig;
use crate::scene::{DrawItem, collect_tile_ids, draw_list};
use crate::segment_cache::{SegmentCache, UpdateReport};
use crate::tileset_cache::{SyncReport, TilesetCache};
use crate::Result;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// What one [`World::tick`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Block residency changes
    pub segments: UpdateReport,
    /// Tileset cache changes
    pub tilesets: SyncReport,
}

/// An opened world: pack, block cache and tileset cache for one map
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    pack: ArchivePack,
    segments: SegmentCache,
    tilesets: TilesetCache,
}

impl World {
    /// Open the pack and prepare empty caches
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the pack index
    /// cannot be read
    pub fn open(config: WorldConfig) -> Result<Self> {
        config.validate()?;

        let pack = ArchivePack::open(&config.pack_index, &config.pack_data)?;
        let segments = SegmentCache::new(&config.map_root, config.map_id, config.viewport);

        info!(
            "Opened world: map {} under {}, {} pack entries",
            config.map_id,
            config.map_root.display(),
            pack.len()
        );

        Ok(Self {
            config,
            pack,
            segments,
            tilesets: TilesetCache::new(),
        })
    }

    /// Move the camera to world `(cx, cy)`
    ///
    /// Updates the resident blocks, then brings the tileset cache in line
    /// with the tile ids those blocks reference.
    pub fn tick(&mut self, cx: i32, cy: i32) -> TickReport {
        let segments = self.segments.update(cx, cy);
        let ids = self.tile_ids();
        let tilesets = self.tilesets.sync(&self.pack, &ids);

        debug!(
            "Tick at ({}, {}): {} blocks, {} tilesets",
            cx,
            cy,
            self.segments.resident_len(),
            self.tilesets.len()
        );

        TickReport { segments, tilesets }
    }

    /// Tileset ids referenced by the resident blocks
    pub fn tile_ids(&self) -> BTreeSet<u32> {
        collect_tile_ids(self.segments.active_segments())
    }

    /// Decorations and object tiles of the resident blocks in draw order
    pub fn draw_list(&self) -> Vec<DrawItem> {
        draw_list(self.segments.active_segments())
    }

    /// Configuration the world was opened with
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Opened pack
    pub const fn pack(&self) -> &ArchivePack {
        &self.pack
    }

    /// Block cache
    pub const fn segments(&self) -> &SegmentCache {
        &self.segments
    }

    /// Tileset cache
    pub const fn tilesets(&self) -> &TilesetCache {
        &self.tilesets
    }
}
