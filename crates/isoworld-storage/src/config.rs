//! Configuration for opening a world

use crate::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Horizontal footprint of a map cell in viewport pixels
const CELL_PIXEL_WIDTH: u32 = 24;

/// Vertical footprint of a map cell in viewport pixels
const CELL_PIXEL_HEIGHT: u32 = 12;

/// Extra cells kept beyond the visible edge
const OVERSCAN: u32 = 2;

/// Size of the visible area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// World cells between the camera and the left or right edge of the
    /// loaded area
    pub fn horizontal_reach(self) -> i32 {
        reach(self.width, CELL_PIXEL_WIDTH)
    }

    /// World cells between the camera and the top or bottom edge of the
    /// loaded area
    pub fn vertical_reach(self) -> i32 {
        reach(self.height, CELL_PIXEL_HEIGHT)
    }
}

fn reach(extent: u32, cell: u32) -> i32 {
    i32::try_from((extent / 2) / cell * OVERSCAN).unwrap_or(i32::MAX)
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200, 900)
    }
}

/// Configuration for a [`World`](crate::World)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Path of the pack index
    pub pack_index: PathBuf,

    /// Path of the pack data file
    pub pack_data: PathBuf,

    /// Directory holding one sub-directory of block files per map id
    pub map_root: PathBuf,

    /// Map to load blocks from
    pub map_id: u32,

    /// Visible area used to decide which blocks stay loaded
    pub viewport: Viewport,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            pack_index: PathBuf::from("Tile.idx"),
            pack_data: PathBuf::from("Tile.pak"),
            map_root: PathBuf::from("map"),
            map_id: 0,
            viewport: Viewport::default(),
        }
    }
}

impl WorldConfig {
    /// Create a configuration with the default layout under `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let defaults = Self::default();
        let root = root.as_ref();
        Self {
            pack_index: root.join(defaults.pack_index),
            pack_data: root.join(defaults.pack_data),
            map_root: root.join(defaults.map_root),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid JSON
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Config(format!("{}: {e}", path.display())))
    }

    /// Set the pack index and data paths
    #[must_use]
    pub fn with_pack<P: AsRef<Path>, Q: AsRef<Path>>(mut self, index: P, data: Q) -> Self {
        self.pack_index = index.as_ref().to_path_buf();
        self.pack_data = data.as_ref().to_path_buf();
        self
    }

    /// Set the map root directory
    #[must_use]
    pub fn with_map_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.map_root = path.as_ref().to_path_buf();
        self
    }

    /// Set the map id
    #[must_use]
    pub const fn with_map_id(mut self, map_id: u32) -> Self {
        self.map_id = map_id;
        self
    }

    /// Set the viewport size
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Check that the configuration can be used to open a world
    ///
    /// # Errors
    ///
    /// Returns error if the viewport has a zero dimension
    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(StorageError::Config(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        Ok(())
    }
}
