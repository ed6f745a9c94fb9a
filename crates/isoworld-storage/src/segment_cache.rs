//! Viewport-driven cache of decoded map blocks
//!
//! The cache holds exactly the blocks overlapping the area around the camera
//! that the current [`Viewport`] can see, plus a small overscan margin.
//! Every [`SegmentCache::update`] loads blocks that came into range and
//! drops those that left it. There is no capacity limit and no recency
//! tracking; residency is decided purely by position.

use crate::config::Viewport;
use isoworld_formats::segment::{BLOCK_SIZE, BlockCoord, MapSegment};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Source of raw block file bytes
///
/// Implementations return `Ok(None)` for blocks that do not exist; the
/// cache treats those as empty space rather than errors.
pub trait BlockSource: Send + Sync {
    /// Read the block file for `block` of map `map_id`
    fn read_block(&self, map_id: u32, block: BlockCoord) -> std::io::Result<Option<Vec<u8>>>;
}

/// Reads block files from `<root>/<map id>/<block file name>`
#[derive(Debug, Clone)]
pub struct DirectoryBlockSource {
    root: PathBuf,
}

impl DirectoryBlockSource {
    /// Create a source rooted at the map directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Map root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a block file, or `None` when the block cannot be named
    pub fn block_path(&self, map_id: u32, block: BlockCoord) -> Option<PathBuf> {
        block
            .file_name()
            .map(|name| self.root.join(map_id.to_string()).join(name))
    }
}

impl BlockSource for DirectoryBlockSource {
    fn read_block(&self, map_id: u32, block: BlockCoord) -> std::io::Result<Option<Vec<u8>>> {
        let Some(path) = self.block_path(map_id, block) else {
            return Ok(None);
        };

        match std::fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Blocks touched by one [`SegmentCache::update`], each list sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Blocks decoded and made resident
    pub loaded: Vec<BlockCoord>,
    /// Resident blocks dropped because they left the needed area
    pub evicted: Vec<BlockCoord>,
    /// Needed blocks with no file
    pub missing: Vec<BlockCoord>,
    /// Needed blocks whose file could not be read or decoded
    pub failed: Vec<BlockCoord>,
}

impl UpdateReport {
    /// Check if the update changed the resident set
    pub fn is_unchanged(&self) -> bool {
        self.loaded.is_empty() && self.evicted.is_empty()
    }
}

/// Cumulative cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Blocks decoded
    pub loads: u64,
    /// Blocks dropped
    pub evictions: u64,
    /// Lookups of blocks with no file
    pub misses: u64,
    /// Blocks that failed to read or decode
    pub failures: u64,
}

/// Decoded blocks around the camera for one map
#[derive(Debug)]
pub struct SegmentCache<S = DirectoryBlockSource> {
    source: S,
    map_id: u32,
    viewport: Viewport,
    resident: HashMap<BlockCoord, MapSegment>,
    // Needed blocks that failed to read or decode, skipped until out of view
    failed: HashSet<BlockCoord>,
    stats: CacheStats,
}

impl SegmentCache<DirectoryBlockSource> {
    /// Create an empty cache reading block files under `map_root`
    pub fn new(map_root: impl AsRef<Path>, map_id: u32, viewport: Viewport) -> Self {
        Self::with_source(DirectoryBlockSource::new(map_root), map_id, viewport)
    }
}

impl<S: BlockSource> SegmentCache<S> {
    /// Create an empty cache over an arbitrary block source
    pub fn with_source(source: S, map_id: u32, viewport: Viewport) -> Self {
        Self {
            source,
            map_id,
            viewport,
            resident: HashMap::new(),
            failed: HashSet::new(),
            stats: CacheStats::default(),
        }
    }

    /// Blocks that must be resident for a camera at world `(cx, cy)`
    pub fn needed_blocks(&self, cx: i32, cy: i32) -> HashSet<BlockCoord> {
        let reach_x = self.viewport.horizontal_reach();
        let reach_y = self.viewport.vertical_reach();

        let first = BlockCoord::containing(cx.saturating_sub(reach_x), cy.saturating_sub(reach_y));
        let last = BlockCoord::containing(cx.saturating_add(reach_x), cy.saturating_add(reach_y));

        let step = BLOCK_SIZE as usize;
        let mut needed = HashSet::new();
        for x in (first.x()..=last.x()).step_by(step) {
            for y in (first.y()..=last.y()).step_by(step) {
                needed.insert(BlockCoord::containing(x, y));
            }
        }
        needed
    }

    /// Bring the resident set in line with a camera at world `(cx, cy)`
    ///
    /// Needed blocks that are not resident are read and decoded; absent
    /// files are skipped quietly and unreadable or corrupt ones are logged
    /// once and skipped until they leave the needed area. Resident blocks
    /// outside the needed area are then dropped. Calling this twice with the
    /// same center decodes nothing the second time.
    pub fn update(&mut self, cx: i32, cy: i32) -> UpdateReport {
        let needed = self.needed_blocks(cx, cy);
        let mut report = UpdateReport::default();

        for &block in &needed {
            if self.resident.contains_key(&block) || self.failed.contains(&block) {
                continue;
            }

            let data = match self.source.read_block(self.map_id, block) {
                Ok(Some(data)) => data,
                Ok(None) => {
                    trace!("No block file for {} on map {}", block, self.map_id);
                    self.stats.misses += 1;
                    report.missing.push(block);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to read block {} on map {}: {}", block, self.map_id, e);
                    self.failed.insert(block);
                    self.stats.failures += 1;
                    report.failed.push(block);
                    continue;
                }
            };

            match MapSegment::parse(&data, self.map_id, block.x(), block.y()) {
                Ok(segment) => {
                    debug!("Loaded block {} on map {}", block, self.map_id);
                    self.resident.insert(block, segment);
                    self.stats.loads += 1;
                    report.loaded.push(block);
                }
                Err(e) => {
                    warn!("Skipping block {} on map {}: {}", block, self.map_id, e);
                    self.failed.insert(block);
                    self.stats.failures += 1;
                    report.failed.push(block);
                }
            }
        }

        self.resident.retain(|block, _| {
            let keep = needed.contains(block);
            if !keep {
                report.evicted.push(*block);
            }
            keep
        });
        self.stats.evictions += report.evicted.len() as u64;
        self.failed.retain(|block| needed.contains(block));

        for list in [
            &mut report.loaded,
            &mut report.evicted,
            &mut report.missing,
            &mut report.failed,
        ] {
            list.sort_unstable();
        }

        if !report.is_unchanged() {
            debug!(
                "Block update at ({}, {}): {} loaded, {} evicted, {} resident",
                cx,
                cy,
                report.loaded.len(),
                report.evicted.len(),
                self.resident.len()
            );
        }

        report
    }

    /// Resident segments in no particular order
    pub fn active_segments(&self) -> impl Iterator<Item = &MapSegment> {
        self.resident.values()
    }

    /// Resident segment for `block`
    pub fn segment(&self, block: BlockCoord) -> Option<&MapSegment> {
        self.resident.get(&block)
    }

    /// Check whether `block` is resident
    pub fn is_resident(&self, block: BlockCoord) -> bool {
        self.resident.contains_key(&block)
    }

    /// Number of resident segments
    pub fn resident_len(&self) -> usize {
        self.resident.len()
    }

    /// Cumulative counters since creation
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every resident segment and forget earlier failures
    pub fn clear(&mut self) {
        self.stats.evictions += self.resident.len() as u64;
        self.resident.clear();
        self.failed.clear();
    }

    /// Map the cache reads from
    pub const fn map_id(&self) -> u32 {
        self.map_id
    }

    /// Viewport used to compute the needed area
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Underlying block source
    pub const fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use isoworld_test_utils::SegmentBuilder;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    /// In-memory source that counts reads
    #[derive(Default)]
    struct MemorySource {
        blocks: HashMap<BlockCoord, Vec<u8>>,
        reads: Mutex<Vec<BlockCoord>>,
    }

    impl MemorySource {
        fn with_blocks(blocks: impl IntoIterator<Item = (i32, i32)>) -> Self {
            let bytes = SegmentBuilder::new().fill_terrain(0x100).build();
            Self {
                blocks: blocks
                    .into_iter()
                    .map(|(x, y)| (BlockCoord::containing(x, y), bytes.clone()))
                    .collect(),
                reads: Mutex::new(Vec::new()),
            }
        }

        fn reads(&self) -> usize {
            self.reads.lock().len()
        }
    }

    impl BlockSource for MemorySource {
        fn read_block(&self, _map_id: u32, block: BlockCoord) -> std::io::Result<Option<Vec<u8>>> {
            self.reads.lock().push(block);
            Ok(self.blocks.get(&block).cloned())
        }
    }

    fn small_viewport() -> Viewport {
        // Reach of 4 cells in each direction
        Viewport::new(96, 48)
    }

    fn grid(range: std::ops::RangeInclusive<i32>) -> Vec<(i32, i32)> {
        range
            .clone()
            .flat_map(|bx| range.clone().map(move |by| (bx * 64, by * 64)))
            .collect()
    }

    #[test]
    fn test_needed_blocks_center_of_block() {
        let cache = SegmentCache::with_source(MemorySource::default(), 0, small_viewport());
        let needed = cache.needed_blocks(32, 32);
        assert_eq!(needed.len(), 1);
        assert!(needed.contains(&BlockCoord::containing(0, 0)));
    }

    #[test]
    fn test_needed_blocks_crosses_boundary() {
        let cache = SegmentCache::with_source(MemorySource::default(), 0, small_viewport());
        let needed = cache.needed_blocks(62, 1);
        let mut blocks: Vec<_> = needed.into_iter().collect();
        blocks.sort_unstable();
        assert_eq!(
            blocks,
            vec![
                BlockCoord::containing(0, -64),
                BlockCoord::containing(0, 0),
                BlockCoord::containing(64, -64),
                BlockCoord::containing(64, 0),
            ]
        );
    }

    #[test]
    fn test_needed_blocks_default_viewport() {
        let cache = SegmentCache::with_source(MemorySource::default(), 0, Viewport::default());
        let needed = cache.needed_blocks(33068, 32806);
        // x spans 33018..=33118, y spans 32732..=32880
        let xs: HashSet<_> = needed.iter().map(|b| b.x()).collect();
        let ys: HashSet<_> = needed.iter().map(|b| b.y()).collect();
        assert_eq!(xs, HashSet::from([32960, 33024, 33088]));
        assert_eq!(ys, HashSet::from([32704, 32768, 32832]));
        assert_eq!(needed.len(), 9);
    }

    #[test]
    fn test_update_loads_and_is_idempotent() {
        let source = MemorySource::with_blocks(grid(-2..=2));
        let mut cache = SegmentCache::with_source(source, 0, small_viewport());

        let first = cache.update(62, 1);
        assert_eq!(first.loaded.len(), 4);
        assert!(first.evicted.is_empty());
        assert_eq!(cache.resident_len(), 4);
        let reads = cache.source().reads();

        let second = cache.update(62, 1);
        assert!(second.is_unchanged());
        assert_eq!(cache.source().reads(), reads);
        assert_eq!(cache.stats().loads, 4);
    }

    #[test]
    fn test_update_evicts_blocks_out_of_range() {
        let source = MemorySource::with_blocks(grid(0..=10));
        let mut cache = SegmentCache::with_source(source, 0, small_viewport());

        cache.update(32, 32);
        assert!(cache.is_resident(BlockCoord::containing(0, 0)));

        let report = cache.update(640 + 32, 640 + 32);
        assert_eq!(report.evicted, vec![BlockCoord::containing(0, 0)]);
        assert_eq!(report.loaded, vec![BlockCoord::containing(640, 640)]);
        assert!(!cache.is_resident(BlockCoord::containing(0, 0)));
        assert_eq!(cache.stats().evictions, 1);

        let resident: Vec<_> = cache.active_segments().map(MapSegment::origin).collect();
        assert_eq!(resident, vec![BlockCoord::containing(640, 640)]);
    }

    #[test]
    fn test_missing_blocks_are_skipped() {
        let source = MemorySource::with_blocks([(0, 0)]);
        let mut cache = SegmentCache::with_source(source, 0, small_viewport());

        let report = cache.update(2, 2);
        assert_eq!(report.loaded, vec![BlockCoord::containing(0, 0)]);
        assert_eq!(report.missing.len(), 3);
        assert!(report.failed.is_empty());
        assert_eq!(cache.stats().misses, 3);
    }

    #[test]
    fn test_corrupt_block_skipped_while_in_view() {
        let mut source = MemorySource::default();
        source
            .blocks
            .insert(BlockCoord::containing(0, 0), vec![0u8; 10]);
        let mut cache = SegmentCache::with_source(source, 0, small_viewport());

        let report = cache.update(32, 32);
        assert_eq!(report.failed, vec![BlockCoord::containing(0, 0)]);
        assert_eq!(cache.resident_len(), 0);
        assert_eq!(cache.source().reads(), 1);

        let second = cache.update(32, 32);
        assert!(second.is_unchanged());
        assert!(second.failed.is_empty());
        assert_eq!(cache.stats().failures, 1);
        assert_eq!(cache.source().reads(), 1);
    }

    #[test]
    fn test_corrupt_block_read_again_after_leaving_view() {
        let mut source = MemorySource::default();
        source
            .blocks
            .insert(BlockCoord::containing(0, 0), vec![0u8; 10]);
        let mut cache = SegmentCache::with_source(source, 0, small_viewport());

        cache.update(32, 32);
        cache.update(640 + 32, 640 + 32);
        let report = cache.update(32, 32);
        assert_eq!(report.failed, vec![BlockCoord::containing(0, 0)]);
        assert_eq!(cache.stats().failures, 2);
    }

    #[test]
    fn test_clear() {
        let source = MemorySource::with_blocks([(0, 0)]);
        let mut cache = SegmentCache::with_source(source, 0, small_viewport());
        cache.update(32, 32);
        cache.clear();
        assert_eq!(cache.resident_len(), 0);
        assert_eq!(cache.update(32, 32).loaded.len(), 1);
    }

    #[test]
    fn test_directory_source_paths() {
        let source = DirectoryBlockSource::new("/maps");
        assert_eq!(
            source.block_path(4, BlockCoord::containing(33068, 32806)),
            Some(PathBuf::from("/maps/4/80048000.s32"))
        );
        assert_eq!(source.block_path(0, BlockCoord::containing(i32::MIN, 0)), None);
    }

    #[test]
    fn test_directory_source_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryBlockSource::new(dir.path());
        assert!(
            source
                .read_block(0, BlockCoord::containing(0, 0))
                .expect("Operation should succeed")
                .is_none()
        );
    }
}
