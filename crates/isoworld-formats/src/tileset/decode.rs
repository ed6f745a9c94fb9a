//! Per-tile decoding for both tile encodings

use crate::tileset::error::TileError;
use crate::tileset::grid::{PixelGrid, TILE_CENTER, TILE_HEIGHT};
use binrw::BinRead;
use binrw::io::{Cursor, Read};

/// Flag bit selecting the run-length sprite encoding
pub const SPRITE_FLAG: u8 = 0x02;

/// Samples stored in a standard (diamond) tile record
pub const STANDARD_SAMPLE_COUNT: usize = 288;

/// Last row of the widening half of a standard tile
const STANDARD_WIDEST_ROW: usize = 11;

/// Encoding of a single tile record, chosen by its flag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileEncoding {
    /// Diamond-shaped half tile mirrored about the vertical centre line
    Standard,
    /// Sparse sprite stored as per-row runs of samples
    Sprite,
}

impl TileEncoding {
    /// Select the encoding from a tile's flag byte
    pub const fn from_flag(flag: u8) -> Self {
        if flag & SPRITE_FLAG != 0 {
            Self::Sprite
        } else {
            Self::Standard
        }
    }
}

/// Visible half-width of row `row` in a standard tile
///
/// Rows widen by two samples up to row 11 and then narrow by two per row,
/// reaching zero on the last row. The widths of all 24 rows sum to
/// [`STANDARD_SAMPLE_COUNT`].
pub const fn standard_row_width(row: usize) -> usize {
    let width = 2 * (row + 1);
    if row > STANDARD_WIDEST_ROW {
        width - 4 * (row - STANDARD_WIDEST_ROW)
    } else {
        width
    }
}

/// Decode the tile record starting at absolute byte `position` of `data`
pub fn decode_tile(data: &[u8], position: u64) -> Result<(TileEncoding, PixelGrid), TileError> {
    let mut reader = TileReader::new(data, position);
    let encoding = TileEncoding::from_flag(reader.u8()?);

    let grid = match encoding {
        TileEncoding::Sprite => decode_sprite(&mut reader)?,
        TileEncoding::Standard => decode_standard(&mut reader)?,
    };

    Ok((encoding, grid))
}

/// Run-length sprite: origin, height, then per-row segments of samples
///
/// Each segment is a skip byte (halved before use), a width byte and that
/// many samples. Samples landing outside the grid are read and dropped.
fn decode_sprite(reader: &mut TileReader<'_>) -> Result<PixelGrid, TileError> {
    let origin_x = usize::from(reader.u8()?);
    let origin_y = usize::from(reader.u8()?);
    let _width = reader.u8()?;
    let height = reader.u8()?;

    let mut grid = PixelGrid::new();

    for row in 0..usize::from(height) {
        let segment_count = reader.u8()?;
        let mut column = 0usize;

        for _ in 0..segment_count {
            column += usize::from(reader.u8()? / 2);
            let segment_width = usize::from(reader.u8()?);

            for k in 0..segment_width {
                let sample = reader.u16()?;
                grid.set_clipped(origin_y + row, origin_x + column + k, sample);
            }
            column += segment_width;
        }
    }

    Ok(grid)
}

/// Standard tile: 288 samples laid out as a mirrored diamond
fn decode_standard(reader: &mut TileReader<'_>) -> Result<PixelGrid, TileError> {
    let samples = reader.u16_samples(STANDARD_SAMPLE_COUNT)?;

    let mut grid = PixelGrid::new();
    let mut consumed = 0usize;

    for row in 0..TILE_HEIGHT {
        let width = standard_row_width(row);
        let left_start = TILE_CENTER - width;

        for j in 0..width {
            let Some(&sample) = samples.get(consumed) else {
                return Err(TileError::SampleCount {
                    expected: STANDARD_SAMPLE_COUNT,
                    actual: consumed + 1,
                });
            };
            grid.set(row, left_start + j, sample);
            grid.set(row, TILE_CENTER + j, sample);
            consumed += 1;
        }
    }

    if consumed != STANDARD_SAMPLE_COUNT {
        return Err(TileError::SampleCount {
            expected: STANDARD_SAMPLE_COUNT,
            actual: consumed,
        });
    }

    Ok(grid)
}

/// Little-endian reader over one tile record
///
/// Any end-of-stream is reported as [`TileError::Truncated`] carrying the
/// record's start position.
struct TileReader<'a> {
    cursor: Cursor<&'a [u8]>,
    start: u64,
}

impl<'a> TileReader<'a> {
    fn new(data: &'a [u8], start: u64) -> Self {
        let mut cursor = Cursor::new(data);
        cursor.set_position(start);
        Self { cursor, start }
    }

    fn map_err(&self, err: binrw::Error) -> TileError {
        if err.is_eof() {
            TileError::Truncated { offset: self.start }
        } else {
            TileError::BinRw(err)
        }
    }

    fn u8(&mut self) -> Result<u8, TileError> {
        u8::read_le(&mut self.cursor).map_err(|e| self.map_err(e))
    }

    fn u16(&mut self) -> Result<u16, TileError> {
        u16::read_le(&mut self.cursor).map_err(|e| self.map_err(e))
    }

    fn u16_samples(&mut self, count: usize) -> Result<Vec<u16>, TileError> {
        let mut raw = vec![0u8; count * 2];
        self.cursor
            .read_exact(&mut raw)
            .map_err(|_| TileError::Truncated { offset: self.start })?;
        Ok(raw
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.cursor.position()
    }
}
