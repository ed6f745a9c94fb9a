//! Map segment records and parsing

use crate::PackedTileRef;
use crate::segment::coord::{BLOCK_SIZE, BlockCoord};
use crate::segment::error::{Result, Section, SegmentError};
use binrw::BinRead;
use binrw::io::{Cursor, Read};
use std::collections::BTreeSet;

/// Columns per block
pub const SEGMENT_COLUMNS: usize = BLOCK_SIZE as usize;

/// Rows per block
pub const SEGMENT_ROWS: usize = BLOCK_SIZE as usize;

/// Half-columns per row; every map column is split into a left and right half
pub const HALF_COLUMNS: usize = SEGMENT_COLUMNS * 2;

/// Cells in the terrain and attribute grids
pub const SEGMENT_CELLS: usize = SEGMENT_ROWS * HALF_COLUMNS;

/// Value of both leading bytes of a padding object record
pub const OBJECT_PADDING_MARKER: u8 = 205;

/// Bytes following the two marker bytes of a padding record
const OBJECT_PADDING_TAIL: usize = 5;

/// Extra tile drawn on the ground, above terrain and below objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoration {
    /// Half-column within the block (`0..128`)
    pub half_x: u8,
    /// Row within the block
    pub y: u8,
    /// Tile to draw
    pub tile: PackedTileRef,
}

/// One tile of a map object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectTile {
    /// Half-column within the block
    pub x: u8,
    /// Row within the block
    pub y: u8,
    /// Layer height used for draw ordering
    pub height: u8,
    /// Tile to draw
    pub tile: PackedTileRef,
}

/// A multi-tile map object such as a building or tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapObject {
    /// Tiles in file order, padding records removed
    pub tiles: Vec<ObjectTile>,
}

/// Decoded contents of one 64×64 block file
///
/// Terrain and attributes are stored row-major with two half-columns per map
/// column: the cell for column `c`, row `r`, half `h` is at
/// `r * 128 + 2 * c + h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSegment {
    map_id: u32,
    origin: BlockCoord,
    terrain: Vec<PackedTileRef>,
    decorations: Vec<Decoration>,
    attributes: Vec<u16>,
    objects: Vec<MapObject>,
}

impl MapSegment {
    /// Parse a block file
    ///
    /// `block_x`/`block_y` may be any world coordinate inside the block; the
    /// stored origin is floored to 64-alignment. Sections are read in file
    /// order and any early end of data fails the whole segment.
    pub fn parse(data: &[u8], map_id: u32, block_x: i32, block_y: i32) -> Result<Self> {
        let mut reader = SectionReader::new(data);

        reader.enter(Section::Terrain);
        let terrain = reader
            .u32_grid()?
            .into_iter()
            .map(PackedTileRef::new)
            .collect();

        reader.enter(Section::Decorations);
        let decoration_count = reader.u16()?;
        let mut decorations = Vec::with_capacity(usize::from(decoration_count));
        for _ in 0..decoration_count {
            decorations.push(Decoration {
                half_x: reader.u8()?,
                y: reader.u8()?,
                tile: PackedTileRef::new(reader.u32()?),
            });
        }

        reader.enter(Section::Attributes);
        let attributes = reader.u16_grid()?;

        reader.enter(Section::Objects);
        let object_count = reader.u32()?;
        let mut objects = Vec::new();
        for _ in 0..object_count {
            let _index = reader.u16()?;
            let tile_count = reader.u16()?;
            let mut tiles = Vec::with_capacity(usize::from(tile_count));

            for _ in 0..tile_count {
                let x = reader.u8()?;
                let y = reader.u8()?;
                if x == OBJECT_PADDING_MARKER && y == OBJECT_PADDING_MARKER {
                    reader.skip(OBJECT_PADDING_TAIL)?;
                    continue;
                }
                tiles.push(ObjectTile {
                    x,
                    y,
                    height: reader.u8()?,
                    tile: PackedTileRef::new(reader.u32()?),
                });
            }

            objects.push(MapObject { tiles });
        }

        Ok(Self {
            map_id,
            origin: BlockCoord::containing(block_x, block_y),
            terrain,
            decorations,
            attributes,
            objects,
        })
    }

    /// Map the block belongs to
    pub const fn map_id(&self) -> u32 {
        self.map_id
    }

    /// 64-aligned origin of the block
    pub const fn origin(&self) -> BlockCoord {
        self.origin
    }

    /// Terrain references, [`SEGMENT_CELLS`] long
    pub fn terrain(&self) -> &[PackedTileRef] {
        &self.terrain
    }

    /// Attribute flags, [`SEGMENT_CELLS`] long
    pub fn attributes(&self) -> &[u16] {
        &self.attributes
    }

    /// Ground decorations in file order
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Objects in file order
    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    /// Terrain reference of one half cell
    pub fn terrain_at(&self, column: usize, row: usize, half: usize) -> Option<PackedTileRef> {
        cell_index(column, row, half).map(|index| self.terrain[index])
    }

    /// Attribute flags of one half cell
    pub fn attribute_at(&self, column: usize, row: usize, half: usize) -> Option<u16> {
        cell_index(column, row, half).map(|index| self.attributes[index])
    }

    /// Number of ground decorations
    pub fn decoration_count(&self) -> usize {
        self.decorations.len()
    }

    /// Total object tiles across all objects
    pub fn object_tile_count(&self) -> usize {
        self.objects.iter().map(|o| o.tiles.len()).sum()
    }

    /// Every tileset id referenced by terrain, decorations and object tiles
    pub fn tile_ids(&self) -> BTreeSet<u32> {
        let terrain = self.terrain.iter().copied();
        let decorations = self.decorations.iter().map(|d| d.tile);
        let objects = self
            .objects
            .iter()
            .flat_map(|o| o.tiles.iter().map(|t| t.tile));

        terrain
            .chain(decorations)
            .chain(objects)
            .map(PackedTileRef::tile_id)
            .collect()
    }
}

const fn cell_index(column: usize, row: usize, half: usize) -> Option<usize> {
    if column < SEGMENT_COLUMNS && row < SEGMENT_ROWS && half < 2 {
        Some(row * HALF_COLUMNS + 2 * column + half)
    } else {
        None
    }
}

/// Little-endian reader that tags running out of data with the current section
struct SectionReader<'a> {
    cursor: Cursor<&'a [u8]>,
    section: Section,
}

impl<'a> SectionReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            section: Section::Terrain,
        }
    }

    fn enter(&mut self, section: Section) {
        self.section = section;
    }

    fn truncated(&self) -> SegmentError {
        SegmentError::Truncated {
            section: self.section,
            offset: self.cursor.position(),
        }
    }

    fn map_err(&self, err: binrw::Error) -> SegmentError {
        if err.is_eof() {
            self.truncated()
        } else {
            SegmentError::BinRw(err)
        }
    }

    fn u8(&mut self) -> Result<u8> {
        u8::read_le(&mut self.cursor).map_err(|e| self.map_err(e))
    }

    fn u16(&mut self) -> Result<u16> {
        u16::read_le(&mut self.cursor).map_err(|e| self.map_err(e))
    }

    fn u32(&mut self) -> Result<u32> {
        u32::read_le(&mut self.cursor).map_err(|e| self.map_err(e))
    }

    fn bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| self.truncated())?;
        Ok(buf)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.bytes(len).map(|_| ())
    }

    fn u32_grid(&mut self) -> Result<Vec<u32>> {
        let raw = self.bytes(SEGMENT_CELLS * 4)?;
        Ok(raw
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    fn u16_grid(&mut self) -> Result<Vec<u16>> {
        let raw = self.bytes(SEGMENT_CELLS * 2)?;
        Ok(raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect())
    }
}
