//! World-space views of resident segments
//!
//! Block-relative records are converted to world coordinates here. Every
//! map column holds two half cells, so a half-column `hx` inside a block at
//! origin `(ox, oy)` lands on world column `ox + hx / 2`, half `hx % 2`.

use isoworld_formats::PackedTileRef;
use isoworld_formats::segment::{HALF_COLUMNS, MapSegment};
use std::collections::BTreeSet;

/// Union of the tileset ids referenced by `segments`
pub fn collect_tile_ids<'a>(segments: impl IntoIterator<Item = &'a MapSegment>) -> BTreeSet<u32> {
    segments
        .into_iter()
        .flat_map(MapSegment::tile_ids)
        .collect()
}

/// Where a drawable came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// Ground decoration
    Decoration,
    /// Tile of a map object
    Object,
}

/// A decoration or object tile placed in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawItem {
    /// World column
    pub world_x: i32,
    /// World row
    pub world_y: i32,
    /// Half of the column, 0 (left) or 1 (right)
    pub half: u8,
    /// Draw layer; decorations are always 0
    pub height: u8,
    /// Tile to draw
    pub tile: PackedTileRef,
    /// Record type
    pub kind: DrawKind,
}

impl DrawItem {
    fn place(segment: &MapSegment, half_x: u8, y: u8) -> (i32, i32, u8) {
        let origin = segment.origin();
        (
            origin.x() + i32::from(half_x / 2),
            origin.y() + i32::from(y),
            half_x % 2,
        )
    }

    /// Key the draw list is ordered by
    pub const fn sort_key(&self) -> (u8, i32, i32) {
        (self.height, self.world_y, self.world_x)
    }
}

/// Decorations and object tiles of `segments` in draw order
///
/// Items are sorted by height, then world row, then world column. The sort
/// is stable, so items with equal keys keep the order they were read in.
pub fn draw_list<'a>(segments: impl IntoIterator<Item = &'a MapSegment>) -> Vec<DrawItem> {
    let mut items = Vec::new();

    for segment in segments {
        for decoration in segment.decorations() {
            let (world_x, world_y, half) = DrawItem::place(segment, decoration.half_x, decoration.y);
            items.push(DrawItem {
                world_x,
                world_y,
                half,
                height: 0,
                tile: decoration.tile,
                kind: DrawKind::Decoration,
            });
        }

        for tile in segment.objects().iter().flat_map(|o| &o.tiles) {
            let (world_x, world_y, half) = DrawItem::place(segment, tile.x, tile.y);
            items.push(DrawItem {
                world_x,
                world_y,
                half,
                height: tile.height,
                tile: tile.tile,
                kind: DrawKind::Object,
            });
        }
    }

    items.sort_by_key(DrawItem::sort_key);
    items
}

/// One terrain half cell in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerrainCell {
    /// World column
    pub world_x: i32,
    /// World row
    pub world_y: i32,
    /// Half of the column, 0 (left) or 1 (right)
    pub half: u8,
    /// Terrain tile
    pub tile: PackedTileRef,
}

/// Every terrain half cell of a segment, row by row
pub fn terrain_cells(segment: &MapSegment) -> impl Iterator<Item = TerrainCell> + '_ {
    let origin = segment.origin();
    segment
        .terrain()
        .iter()
        .enumerate()
        .map(move |(index, &tile)| {
            let row = index / HALF_COLUMNS;
            let half_x = index % HALF_COLUMNS;
            TerrainCell {
                world_x: origin.x() + (half_x / 2) as i32,
                world_y: origin.y() + row as i32,
                half: (half_x % 2) as u8,
                tile,
            }
        })
}
