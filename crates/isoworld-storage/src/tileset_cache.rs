//! Decoded tilesets referenced by the resident map blocks
//!
//! [`TilesetCache::sync`] is the only writer: it loads newly referenced
//! tilesets from the pack and drops those no resident block uses any more.
//! Readers share the decoded sets through [`Arc`] and never block each other.

use crate::archive::ArchivePack;
use isoworld_formats::PackedTileRef;
use isoworld_formats::tileset::{PixelGrid, TileSet};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Tileset ids touched by one [`TilesetCache::sync`], each list sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Tilesets decoded and cached
    pub loaded: Vec<u32>,
    /// Ids with no usable tileset, remembered until no longer referenced
    pub absent: Vec<u32>,
    /// Ids dropped because nothing references them
    pub evicted: Vec<u32>,
}

/// Cache of decoded tilesets keyed by tile id
///
/// An entry of `None` records a tileset that is missing from the pack or
/// cannot be read or decoded, so it is not looked up again while it stays
/// referenced.
#[derive(Debug, Default)]
pub struct TilesetCache {
    tilesets: RwLock<HashMap<u32, Option<Arc<TileSet>>>>,
}

impl TilesetCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the cached ids equal to `ids`
    ///
    /// Tilesets that cannot be read are logged once and remembered as
    /// absent, like those missing from the pack.
    pub fn sync(&self, pack: &ArchivePack, ids: &BTreeSet<u32>) -> SyncReport {
        let wanted: Vec<u32> = {
            let tilesets = self.tilesets.read();
            ids.iter()
                .copied()
                .filter(|id| !tilesets.contains_key(id))
                .collect()
        };

        let mut report = SyncReport::default();
        let mut decoded = Vec::with_capacity(wanted.len());

        for id in wanted {
            let name = TileSet::entry_name(id);
            let entry = match pack.raw_file_contents(&name) {
                Ok(Some(data)) => match TileSet::parse(&data) {
                    Ok(set) => {
                        if !set.failures().is_empty() {
                            warn!(
                                "Tileset {} has {} undecodable tiles",
                                name,
                                set.failures().len()
                            );
                        }
                        debug!("Loaded tileset {} with {} tiles", name, set.len());
                        report.loaded.push(id);
                        Some(Arc::new(set))
                    }
                    Err(e) => {
                        warn!("Skipping tileset {}: {}", name, e);
                        report.absent.push(id);
                        None
                    }
                },
                Ok(None) => {
                    trace!("Tileset {} not in pack", name);
                    report.absent.push(id);
                    None
                }
                Err(e) => {
                    warn!("Failed to read tileset {}: {}", name, e);
                    report.absent.push(id);
                    None
                }
            };
            decoded.push((id, entry));
        }

        let mut tilesets = self.tilesets.write();
        tilesets.extend(decoded);
        tilesets.retain(|id, _| {
            let keep = ids.contains(id);
            if !keep {
                report.evicted.push(*id);
            }
            keep
        });
        report.evicted.sort_unstable();

        report
    }

    /// Decoded tileset for `tile_id`
    pub fn get(&self, tile_id: u32) -> Option<Arc<TileSet>> {
        self.tilesets.read().get(&tile_id).cloned().flatten()
    }

    /// Pixel grid a packed reference points at, if its tileset and tile
    /// decoded
    pub fn pixel_grid(&self, tile: PackedTileRef) -> Option<PixelGrid> {
        self.get(tile.tile_id())
            .and_then(|set| set.get(usize::from(tile.subtile())).cloned())
    }

    /// Check whether `tile_id` is cached, decoded or absent
    pub fn contains(&self, tile_id: u32) -> bool {
        self.tilesets.read().contains_key(&tile_id)
    }

    /// Number of decoded tilesets
    pub fn len(&self) -> usize {
        self.tilesets.read().values().filter(|e| e.is_some()).count()
    }

    /// Check if no tileset is decoded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of decoded tilesets, sorted
    pub fn loaded_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .tilesets
            .read()
            .iter()
            .filter_map(|(id, e)| e.as_ref().map(|_| *id))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.tilesets.write().clear();
    }
}
