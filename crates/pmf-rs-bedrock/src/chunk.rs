//! Target chunk model: palette-indexed sub-chunks covering the Overworld height.

use std::fmt;

use pmf_rs_blockstate::CanonicalBlockState;

/// Y range [-64, 320) = 384 blocks / 16.
pub const SUB_CHUNK_COUNT: usize = 24;

/// Lowest block Y in the Overworld.
pub const MIN_Y: i32 = -64;

/// One past the highest block Y.
pub const MAX_Y: i32 = MIN_Y + SUB_CHUNK_COUNT as i32 * 16;

/// Plains, the only biome legacy worlds know.
pub const PLAINS_BIOME: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column owning block `(x, z)`.
    pub const fn containing(x: i32, z: i32) -> Self {
        Self {
            x: x >> 4,
            z: z >> 4,
        }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// Index into a sub-chunk's block array: x-z-y order.
#[inline]
pub const fn block_index(x: usize, y: usize, z: usize) -> usize {
    (x << 8) | (z << 4) | y
}

/// A 16x16x16 block region with a single storage layer.
///
/// `blocks` stays empty while every block is `palette[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubChunk {
    blocks: Vec<u16>,
    palette: Vec<CanonicalBlockState>,
}

impl SubChunk {
    /// A sub-chunk filled with one state.
    pub fn new_single(state: CanonicalBlockState) -> Self {
        Self {
            blocks: Vec::new(),
            palette: vec![state],
        }
    }

    /// Build from a palette and 4096 indices into it.
    pub fn from_parts(palette: Vec<CanonicalBlockState>, blocks: Vec<u16>) -> Self {
        Self { blocks, palette }
    }

    pub fn palette(&self) -> &[CanonicalBlockState] {
        &self.palette
    }

    /// Palette index of the block at `index`.
    #[inline]
    pub fn palette_index(&self, index: usize) -> u16 {
        self.blocks.get(index).copied().unwrap_or(0)
    }

    pub fn set_block(&mut self, x: usize, y: usize, z: usize, state: &CanonicalBlockState) {
        debug_assert!(x < 16 && y < 16 && z < 16);
        let palette_index = match self.palette.iter().position(|s| s == state) {
            Some(idx) => idx,
            None => {
                self.palette.push(state.clone());
                self.palette.len() - 1
            }
        };
        if self.blocks.is_empty() {
            if palette_index == 0 {
                return;
            }
            self.blocks = vec![0; 4096];
        }
        self.blocks[block_index(x, y, z)] = palette_index as u16;
    }

    pub fn get_block(&self, x: usize, y: usize, z: usize) -> &CanonicalBlockState {
        &self.palette[self.palette_index(block_index(x, y, z)) as usize]
    }

    /// True when no stored block is anything but air.
    pub fn is_air(&self) -> bool {
        if self.blocks.is_empty() {
            return self.palette[0].is_air();
        }
        self.blocks
            .iter()
            .all(|&i| self.palette[i as usize].is_air())
    }
}

/// A full chunk column (16x384x16) with a 16x16 biome map.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkColumn {
    sub_chunks: Vec<SubChunk>,
    biomes: Vec<u32>,
}

impl ChunkColumn {
    /// A column of `air` with every biome set to `biome`.
    pub fn new(air: &CanonicalBlockState, biome: u32) -> Self {
        Self {
            sub_chunks: (0..SUB_CHUNK_COUNT)
                .map(|_| SubChunk::new_single(air.clone()))
                .collect(),
            biomes: vec![biome; 256],
        }
    }

    pub fn sub_chunks(&self) -> &[SubChunk] {
        &self.sub_chunks
    }

    /// Sub-chunks with their Y index (`-4` for the lowest).
    pub fn indexed_sub_chunks(&self) -> impl Iterator<Item = (i8, &SubChunk)> {
        self.sub_chunks
            .iter()
            .enumerate()
            .map(|(i, sc)| (i as i8 + (MIN_Y >> 4) as i8, sc))
    }

    /// Set a block by local `x`/`z` and world `y`. Returns `false` if `y` is out of range.
    pub fn set_block(&mut self, x: usize, y: i32, z: usize, state: &CanonicalBlockState) -> bool {
        let Some(index) = sub_chunk_slot(y) else {
            return false;
        };
        let local_y = (y - MIN_Y) as usize & 0xF;
        self.sub_chunks[index].set_block(x, local_y, z, state);
        true
    }

    pub fn get_block(&self, x: usize, y: i32, z: usize) -> Option<&CanonicalBlockState> {
        let index = sub_chunk_slot(y)?;
        let local_y = (y - MIN_Y) as usize & 0xF;
        Some(self.sub_chunks[index].get_block(x, local_y, z))
    }

    pub fn biome(&self, x: usize, z: usize) -> u32 {
        self.biomes[(x << 4) | z]
    }

    pub fn biomes(&self) -> &[u32] {
        &self.biomes
    }

    pub fn set_biome(&mut self, x: usize, z: usize, biome: u32) {
        self.biomes[(x << 4) | z] = biome;
    }

    pub fn is_empty(&self) -> bool {
        self.sub_chunks.iter().all(SubChunk::is_air)
    }

    /// Per `(x, z)` at `x * 16 + z`: top non-air block Y minus [`MIN_Y`] plus one, 0 if none.
    pub fn heightmap(&self) -> [i16; 256] {
        let mut heightmap = [0i16; 256];
        for x in 0..16usize {
            for z in 0..16usize {
                let top = (MIN_Y..MAX_Y)
                    .rev()
                    .find(|&y| self.get_block(x, y, z).is_some_and(|s| !s.is_air()));
                if let Some(y) = top {
                    heightmap[(x << 4) | z] = (y - MIN_Y + 1) as i16;
                }
            }
        }
        heightmap
    }
}

fn sub_chunk_slot(y: i32) -> Option<usize> {
    if !(MIN_Y..MAX_Y).contains(&y) {
        return None;
    }
    Some(((y - MIN_Y) >> 4) as usize)
}
