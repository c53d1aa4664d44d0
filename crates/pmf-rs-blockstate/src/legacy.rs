use std::fmt;

/// A legacy `(id, meta)` pair as stored in PMF sub-chunks. `meta` is a nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegacyVoxelKey {
    pub id: u8,
    pub meta: u8,
}

impl LegacyVoxelKey {
    pub const AIR: LegacyVoxelKey = LegacyVoxelKey { id: 0, meta: 0 };

    /// `None` when `meta` does not fit in four bits.
    pub fn new(id: u8, meta: u8) -> Option<Self> {
        (meta < 16).then_some(Self { id, meta })
    }
}

impl fmt::Display for LegacyVoxelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.meta)
    }
}
