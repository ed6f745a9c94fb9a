//! Block coordinates and block file naming

use std::fmt;

/// Width and height of a map block in world tiles
pub const BLOCK_SIZE: i32 = 64;

/// Mask clearing the in-block part of a world coordinate
const BLOCK_MASK: i32 = !(BLOCK_SIZE - 1);

/// Bias added to block indices in block file names
pub const BLOCK_NAME_BIAS: i32 = 0x7e00;

/// Extension of block files
pub const BLOCK_FILE_EXTENSION: &str = "s32";

/// Origin of a 64×64 map block
///
/// Both components are always multiples of 64. Construction floors any world
/// coordinate to the block containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockCoord {
    x: i32,
    y: i32,
}

impl BlockCoord {
    /// Block containing world coordinate `(x, y)`
    pub const fn containing(x: i32, y: i32) -> Self {
        Self {
            x: x & BLOCK_MASK,
            y: y & BLOCK_MASK,
        }
    }

    /// World x of the block origin
    pub const fn x(self) -> i32 {
        self.x
    }

    /// World y of the block origin
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Block file name, e.g. `7e0c7e08.s32` for origin `(768, 512)`
    ///
    /// Returns `None` when a biased block index does not fit four hex
    /// digits; no file can exist for such a block.
    pub fn file_name(self) -> Option<String> {
        let name_x = u16::try_from((self.x >> 6) + BLOCK_NAME_BIAS).ok()?;
        let name_y = u16::try_from((self.y >> 6) + BLOCK_NAME_BIAS).ok()?;
        Some(format!("{name_x:04x}{name_y:04x}.{BLOCK_FILE_EXTENSION}"))
    }

    /// Check if world coordinate `(x, y)` lies inside this block
    pub const fn contains(self, x: i32, y: i32) -> bool {
        (x & BLOCK_MASK) == self.x && (y & BLOCK_MASK) == self.y
    }
}

impl fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
