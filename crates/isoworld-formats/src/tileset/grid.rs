//! Fixed-size pixel grids

use std::fmt;

/// Rows in every decoded tile
pub const TILE_HEIGHT: usize = 24;

/// Columns in every decoded tile
pub const TILE_WIDTH: usize = 48;

/// Column of the vertical mirror axis
pub const TILE_CENTER: usize = TILE_WIDTH / 2;

/// A 24×48 grid of RGB555 samples
///
/// Zero samples are transparent. The grid shape is the same for both tile
/// encodings.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelGrid {
    rows: Box<[[u16; TILE_WIDTH]; TILE_HEIGHT]>,
}

impl PixelGrid {
    /// Create a fully transparent grid
    pub fn new() -> Self {
        Self {
            rows: Box::new([[0u16; TILE_WIDTH]; TILE_HEIGHT]),
        }
    }

    /// Sample at `(row, col)`, or `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// One row of samples, or `None` outside the grid
    pub fn row(&self, row: usize) -> Option<&[u16; TILE_WIDTH]> {
        self.rows.get(row)
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[[u16; TILE_WIDTH]; TILE_HEIGHT] {
        &self.rows
    }

    /// Samples in row-major order
    pub fn samples(&self) -> impl Iterator<Item = u16> + '_ {
        self.rows.iter().flat_map(|r| r.iter().copied())
    }

    /// Number of non-transparent samples
    pub fn opaque_count(&self) -> usize {
        self.samples().filter(|&s| s != 0).count()
    }

    /// Check if every sample is transparent
    pub fn is_blank(&self) -> bool {
        self.samples().all(|s| s == 0)
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, sample: u16) {
        self.rows[row][col] = sample;
    }

    /// Write a sample if `(row, col)` lies inside the grid
    ///
    /// Returns `false` when the write was discarded.
    pub(crate) fn set_clipped(&mut self, row: usize, col: usize, sample: u16) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                *slot = sample;
                true
            }
            None => false,
        }
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelGrid")
            .field("height", &TILE_HEIGHT)
            .field("width", &TILE_WIDTH)
            .field("opaque", &self.opaque_count())
            .finish()
    }
}

/// Split an RGB555 sample into its 5-bit red, green and blue channels
///
/// The top bit is unused and ignored.
pub const fn rgb555_channels(sample: u16) -> (u8, u8, u8) {
    (
        ((sample >> 10) & 0x1F) as u8,
        ((sample >> 5) & 0x1F) as u8,
        (sample & 0x1F) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_blank() {
        let grid = PixelGrid::new();
        assert!(grid.is_blank());
        assert_eq!(grid.samples().count(), TILE_WIDTH * TILE_HEIGHT);
    }

    #[test]
    fn test_set_clipped() {
        let mut grid = PixelGrid::new();
        assert!(grid.set_clipped(23, 47, 7));
        assert!(!grid.set_clipped(24, 0, 7));
        assert!(!grid.set_clipped(0, 48, 7));
        assert_eq!(grid.get(23, 47), Some(7));
        assert_eq!(grid.get(24, 0), None);
        assert_eq!(grid.opaque_count(), 1);
    }

    #[test]
    fn test_row_bounds() {
        let mut grid = PixelGrid::new();
        grid.set_clipped(23, 47, 7);
        assert_eq!(grid.row(23).map(|r| r[47]), Some(7));
        assert!(grid.row(TILE_HEIGHT).is_none());
    }

    #[test]
    fn test_rgb555_channels() {
        assert_eq!(rgb555_channels(0x7FFF), (31, 31, 31));
        assert_eq!(rgb555_channels(0x7C00), (31, 0, 0));
        assert_eq!(rgb555_channels(0x03E0), (0, 31, 0));
        assert_eq!(rgb555_channels(0x801F), (0, 0, 31));
    }
}
