//! Test utilities for isoworld
//!
//! Builders for synthetic pack, tileset and map block bytes, plus an
//! on-disk world layout in a temporary directory for tests and examples.

use isoworld_formats::pack::PACK_NAME_LEN;
use isoworld_formats::segment::{BlockCoord, HALF_COLUMNS, OBJECT_PADDING_MARKER, SEGMENT_CELLS};
use isoworld_formats::tileset::{SPRITE_FLAG, STANDARD_SAMPLE_COUNT};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builds a pack index and its data file
#[derive(Debug, Clone, Default)]
pub struct PackBuilder {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl PackBuilder {
    /// Create an empty pack
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; the name is stored as given, NUL-padded to 20 bytes
    pub fn entry(mut self, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.entries
            .push((name.as_bytes().to_vec(), contents.into()));
        self
    }

    /// Append an entry with a raw name field
    pub fn raw_entry(mut self, name: [u8; PACK_NAME_LEN], contents: impl Into<Vec<u8>>) -> Self {
        self.entries.push((name.to_vec(), contents.into()));
        self
    }

    /// Encode the index and data files
    pub fn build(&self) -> (Vec<u8>, Vec<u8>) {
        let mut index = (self.entries.len() as u32).to_le_bytes().to_vec();
        let mut data = Vec::new();

        for (name, contents) in &self.entries {
            let mut field = [0u8; PACK_NAME_LEN];
            let len = name.len().min(PACK_NAME_LEN);
            field[..len].copy_from_slice(&name[..len]);

            index.extend_from_slice(&(data.len() as u32).to_le_bytes());
            index.extend_from_slice(&field);
            index.extend_from_slice(&(contents.len() as u32).to_le_bytes());
            data.extend_from_slice(contents);
        }

        (index, data)
    }
}

/// Encode a standard tile record whose `i`-th sample is `sample(i)`
pub fn standard_tile(sample: impl FnMut(usize) -> u16) -> Vec<u8> {
    let mut out = vec![0u8];
    for s in (0..STANDARD_SAMPLE_COUNT).map(sample) {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// One run of samples in a sprite row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRun {
    /// Skip byte as stored; the decoder advances by half of it
    pub skip: u8,
    /// Samples in the run
    pub samples: Vec<u16>,
}

/// Encode a sprite tile record at origin `(x, y)`
pub fn sprite_tile(x: u8, y: u8, rows: &[Vec<SpriteRun>]) -> Vec<u8> {
    let width = rows
        .iter()
        .map(|runs| {
            runs.iter()
                .map(|r| usize::from(r.skip / 2) + r.samples.len())
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0)
        .min(usize::from(u8::MAX));

    let mut out = vec![SPRITE_FLAG, x, y, width as u8, rows.len() as u8];
    for runs in rows {
        out.push(runs.len() as u8);
        for run in runs {
            out.push(run.skip);
            out.push(run.samples.len() as u8);
            for s in &run.samples {
                out.extend_from_slice(&s.to_le_bytes());
            }
        }
    }
    out
}

/// Wrap tile records in a tileset header with a matching offset table
pub fn tileset_blob(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = (records.len() as u16).to_le_bytes().to_vec();
    out.extend_from_slice(&0u16.to_le_bytes());

    let mut offset = 0u32;
    for record in records {
        out.extend_from_slice(&offset.to_le_bytes());
        offset += record.len() as u32;
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    for record in records {
        out.extend_from_slice(record);
    }
    out
}

/// One record inside a map object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRecord {
    /// A drawable tile
    Tile {
        /// Half-column
        x: u8,
        /// Row
        y: u8,
        /// Draw layer
        height: u8,
        /// Packed tile reference
        tile: u32,
    },
    /// A `(205, 205)` padding record with five filler bytes
    Padding,
}

/// Builds the bytes of a `.s32` block file
#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    terrain: Vec<u32>,
    decorations: Vec<(u8, u8, u32)>,
    attributes: Vec<u16>,
    objects: Vec<Vec<ObjectRecord>>,
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self {
            terrain: vec![0; SEGMENT_CELLS],
            decorations: Vec::new(),
            attributes: vec![0; SEGMENT_CELLS],
            objects: Vec::new(),
        }
    }
}

impl SegmentBuilder {
    /// Block with zeroed grids and no decorations or objects
    pub fn new() -> Self {
        Self::default()
    }

    /// Set every terrain cell to the same packed reference
    pub fn fill_terrain(mut self, tile: u32) -> Self {
        self.terrain.fill(tile);
        self
    }

    /// Set one terrain half cell
    pub fn terrain(mut self, column: usize, row: usize, half: usize, tile: u32) -> Self {
        self.terrain[row * HALF_COLUMNS + 2 * column + half] = tile;
        self
    }

    /// Set one attribute half cell
    pub fn attribute(mut self, column: usize, row: usize, half: usize, flags: u16) -> Self {
        self.attributes[row * HALF_COLUMNS + 2 * column + half] = flags;
        self
    }

    /// Append a ground decoration
    pub fn decoration(mut self, half_x: u8, y: u8, tile: u32) -> Self {
        self.decorations.push((half_x, y, tile));
        self
    }

    /// Append an object made of the given records
    pub fn object(mut self, records: Vec<ObjectRecord>) -> Self {
        self.objects.push(records);
        self
    }

    /// Encode the block file
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SEGMENT_CELLS * 6 + 16);

        for tile in &self.terrain {
            out.extend_from_slice(&tile.to_le_bytes());
        }

        out.extend_from_slice(&(self.decorations.len() as u16).to_le_bytes());
        for &(x, y, tile) in &self.decorations {
            out.push(x);
            out.push(y);
            out.extend_from_slice(&tile.to_le_bytes());
        }

        for flags in &self.attributes {
            out.extend_from_slice(&flags.to_le_bytes());
        }

        out.extend_from_slice(&(self.objects.len() as u32).to_le_bytes());
        for (index, records) in self.objects.iter().enumerate() {
            out.extend_from_slice(&(index as u16).to_le_bytes());
            out.extend_from_slice(&(records.len() as u16).to_le_bytes());
            for record in records {
                match *record {
                    ObjectRecord::Tile { x, y, height, tile } => {
                        out.extend_from_slice(&[x, y, height]);
                        out.extend_from_slice(&tile.to_le_bytes());
                    }
                    ObjectRecord::Padding => {
                        out.extend_from_slice(&[OBJECT_PADDING_MARKER, OBJECT_PADDING_MARKER]);
                        out.extend_from_slice(&[0xCD; 5]);
                    }
                }
            }
        }

        out
    }
}

/// A world laid out on disk in a temporary directory
///
/// ```text
/// <root>/Tile.idx
/// <root>/Tile.pak
/// <root>/map/<map id>/<block>.s32
/// ```
#[derive(Debug)]
pub struct WorldFixture {
    dir: TempDir,
}

impl WorldFixture {
    /// Create an empty fixture directory
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Fixture root
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory holding one sub-directory per map id
    pub fn map_root(&self) -> PathBuf {
        self.root().join("map")
    }

    /// Path of the pack index
    pub fn index_path(&self) -> PathBuf {
        self.root().join("Tile.idx")
    }

    /// Path of the pack data file
    pub fn data_path(&self) -> PathBuf {
        self.root().join("Tile.pak")
    }

    /// Write the pack index and data files
    pub fn write_pack(&self, pack: &PackBuilder) -> std::io::Result<()> {
        let (index, data) = pack.build();
        std::fs::write(self.index_path(), index)?;
        std::fs::write(self.data_path(), data)
    }

    /// Write the block file for the block containing `(x, y)`
    pub fn write_block(&self, map_id: u32, x: i32, y: i32, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let name = BlockCoord::containing(x, y).file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("block ({x}, {y}) has no file name"),
            )
        })?;

        let dir = self.map_root().join(map_id.to_string());
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}
