//! Absolute block positions in the legacy world.

use std::fmt;

/// Blocks along each horizontal axis.
pub const WORLD_SIZE: i32 = 256;
/// Blocks along the vertical axis.
pub const WORLD_HEIGHT: i32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Inside `[0,256) × [0,128) × [0,256)`.
    pub fn in_world(&self) -> bool {
        (0..WORLD_SIZE).contains(&self.x)
            && (0..WORLD_HEIGHT).contains(&self.y)
            && (0..WORLD_SIZE).contains(&self.z)
    }

    /// Owning chunk column `(cx, cz)`.
    pub fn column(&self) -> (i32, i32) {
        (self.x >> 4, self.z >> 4)
    }

    pub fn sub_chunk_y(&self) -> u8 {
        (self.y >> 4) as u8
    }

    /// Coordinates inside the owning sub-chunk.
    pub fn local(&self) -> (usize, usize, usize) {
        (
            (self.x & 0xF) as usize,
            (self.y & 0xF) as usize,
            (self.z & 0xF) as usize,
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
