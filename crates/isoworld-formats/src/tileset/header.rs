//! Tileset header and offset table

use binrw::BinRead;

/// Tileset blob header
///
/// Layout (little-endian):
/// - Tile count (2 bytes)
/// - Reserved (2 bytes)
/// - Tile offsets (`tile_count` × 4 bytes), relative to the end of the header
/// - Reserved (4 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct TilesetHeader {
    /// Number of tile records
    pub tile_count: u16,

    /// Unused
    pub reserved: u16,

    /// Offset of each tile record relative to [`TilesetHeader::size`]
    #[br(count = tile_count)]
    pub offsets: Vec<u32>,

    /// Unused
    pub trailer: u32,
}

impl TilesetHeader {
    /// Size of the encoded header; tile offsets are relative to this position
    pub fn size(&self) -> u64 {
        4 + 4 * self.offsets.len() as u64 + 4
    }

    /// Absolute position of the tile record at `index`
    pub fn tile_position(&self, index: usize) -> Option<u64> {
        self.offsets
            .get(index)
            .map(|&offset| self.size() + u64::from(offset))
    }
}
