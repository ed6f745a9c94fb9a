//! Decoded tilesets

use crate::tileset::decode::{TileEncoding, decode_tile};
use crate::tileset::error::{Result, TileError, TilesetError};
use crate::tileset::grid::PixelGrid;
use crate::tileset::header::TilesetHeader;
use binrw::BinRead;
use binrw::io::Cursor;

/// A successfully decoded tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTile {
    /// Encoding selected by the tile's flag byte
    pub encoding: TileEncoding,
    /// Decoded samples
    pub grid: PixelGrid,
}

/// A tile record that could not be decoded
#[derive(Debug)]
pub struct TileFailure {
    /// Subtile index of the failed record
    pub index: usize,
    /// Offset of the record relative to the end of the header
    pub offset: u32,
    /// Why decoding failed
    pub error: TileError,
}

/// Ordered tiles of one tileset blob
///
/// The position of a tile equals its position in the blob's offset table and
/// is the subtile id used by [`PackedTileRef`](crate::PackedTileRef). A tile
/// that failed to decode keeps its slot (empty) so later subtile ids stay
/// aligned.
#[derive(Debug, Default)]
pub struct TileSet {
    slots: Vec<Option<DecodedTile>>,
    failures: Vec<TileFailure>,
}

impl TileSet {
    /// Pack entry name of the tileset with id `tile_id`
    pub fn entry_name(tile_id: u32) -> String {
        format!("{tile_id}.til")
    }

    /// Decode every tile of a `.til` blob
    ///
    /// Only a damaged header fails the whole blob. Errors inside a tile
    /// record are collected in [`TileSet::failures`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let header = TilesetHeader::read(&mut cursor).map_err(|e| {
            if e.is_eof() {
                TilesetError::TruncatedHeader {
                    available: data.len(),
                }
            } else {
                TilesetError::BinRw(e)
            }
        })?;

        let mut slots = Vec::with_capacity(header.offsets.len());
        let mut failures = Vec::new();

        for (index, &offset) in header.offsets.iter().enumerate() {
            let Some(position) = header.tile_position(index) else {
                break;
            };
            match decode_tile(data, position) {
                Ok((encoding, grid)) => slots.push(Some(DecodedTile { encoding, grid })),
                Err(error) => {
                    failures.push(TileFailure {
                        index,
                        offset,
                        error,
                    });
                    slots.push(None);
                }
            }
        }

        Ok(Self { slots, failures })
    }

    /// Pixel grid for a subtile id, if it decoded
    pub fn get(&self, subtile: usize) -> Option<&PixelGrid> {
        self.tile(subtile).map(|tile| &tile.grid)
    }

    /// Decoded tile for a subtile id, if it decoded
    pub fn tile(&self, subtile: usize) -> Option<&DecodedTile> {
        self.slots.get(subtile).and_then(Option::as_ref)
    }

    /// All slots in offset-table order
    pub fn slots(&self) -> &[Option<DecodedTile>] {
        &self.slots
    }

    /// Tiles that failed to decode
    pub fn failures(&self) -> &[TileFailure] {
        &self.failures
    }

    /// Number of slots, including failed ones
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the blob declared no tiles
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tileset::decode::{SPRITE_FLAG, STANDARD_SAMPLE_COUNT};

    fn blob(records: &[Vec<u8>]) -> Vec<u8> {
        let mut body = Vec::new();
        let mut offsets = Vec::new();
        for record in records {
            offsets.push(body.len() as u32);
            body.extend_from_slice(record);
        }

        let mut out = (records.len() as u16).to_le_bytes().to_vec();
        out.extend_from_slice(&[0, 0]);
        for offset in offsets {
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&body);
        out
    }

    fn standard(fill: u16) -> Vec<u8> {
        let mut out = vec![0u8];
        for _ in 0..STANDARD_SAMPLE_COUNT {
            out.extend_from_slice(&fill.to_le_bytes());
        }
        out
    }

    fn sprite(sample: u16) -> Vec<u8> {
        let [lo, hi] = sample.to_le_bytes();
        vec![SPRITE_FLAG, 0, 0, 1, 1, 1, 0, 1, lo, hi]
    }

    #[test]
    fn test_parse_in_table_order() {
        let data = blob(&[standard(0x1111), sprite(0x2222), standard(0x3333)]);
        let set = TileSet::parse(&data).expect("Operation should succeed");

        assert_eq!(set.len(), 3);
        assert!(set.failures().is_empty());
        assert_eq!(set.tile(0).map(|t| t.encoding), Some(TileEncoding::Standard));
        assert_eq!(set.tile(1).map(|t| t.encoding), Some(TileEncoding::Sprite));
        assert_eq!(set.get(0).and_then(|g| g.get(11, 0)), Some(0x1111));
        assert_eq!(set.get(1).and_then(|g| g.get(0, 0)), Some(0x2222));
        assert_eq!(set.get(2).and_then(|g| g.get(11, 47)), Some(0x3333));
        assert!(set.get(3).is_none());
    }

    #[test]
    fn test_failed_tile_keeps_slot() {
        let mut data = blob(&[sprite(1), standard(2)]);
        // Point the first tile past the end of the blob
        data[4..8].copy_from_slice(&10_000u32.to_le_bytes());

        let set = TileSet::parse(&data).expect("Operation should succeed");
        assert_eq!(set.len(), 2);
        assert!(set.get(0).is_none());
        assert!(set.get(1).is_some());
        assert_eq!(set.failures().len(), 1);
        assert_eq!(set.failures()[0].index, 0);
        assert!(matches!(
            set.failures()[0].error,
            TileError::Truncated { .. }
        ));
    }

    #[test]
    fn test_truncated_last_tile() {
        let mut data = blob(&[sprite(1), standard(2)]);
        data.truncate(data.len() - 10);

        let set = TileSet::parse(&data).expect("Operation should succeed");
        assert!(set.get(0).is_some());
        assert!(set.get(1).is_none());
        assert_eq!(set.failures().len(), 1);
    }

    #[test]
    fn test_truncated_header() {
        let data = [5, 0, 0, 0, 1, 0, 0, 0];
        assert!(matches!(
            TileSet::parse(&data),
            Err(TilesetError::TruncatedHeader { available: 8 })
        ));
    }

    #[test]
    fn test_empty_tileset() {
        let set = TileSet::parse(&blob(&[])).expect("Operation should succeed");
        assert!(set.is_empty());
    }
}
