//! Packed tile references shared by terrain, decoration and object records

use std::fmt;

/// A 32-bit tile reference encoding `tile_id << 8 | subtile`.
///
/// The tile id names a tileset blob (`"{tile_id}.til"`) and the subtile is
/// the position of a pixel grid within that tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PackedTileRef(u32);

impl PackedTileRef {
    /// Wrap a raw packed value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Build a reference from its parts
    pub const fn from_parts(tile_id: u32, subtile: u8) -> Self {
        Self((tile_id << 8) | subtile as u32)
    }

    /// The raw value as stored on disk
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Tileset identifier (`value >> 8`)
    pub const fn tile_id(self) -> u32 {
        self.0 >> 8
    }

    /// Index of the pixel grid within the tileset (`value & 0xFF`)
    pub const fn subtile(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Name of the pack entry holding this reference's tileset
    pub fn tileset_name(self) -> String {
        crate::tileset::TileSet::entry_name(self.tile_id())
    }
}

impl From<u32> for PackedTileRef {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for PackedTileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tile_id(), self.subtile())
    }
}
