//! A decoded chunk column: the sparse set of sub-chunks stored for one `(x, z)`.

use std::collections::BTreeMap;

use crate::error::PmfError;
use crate::pos::BlockPos;
use crate::sub_chunk::{SubChunk, SUB_CHUNK_SIZE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkColumn {
    sub_chunks: BTreeMap<u8, SubChunk>,
}

impl ChunkColumn {
    /// A column with no stored sub-chunks; every block reads as air.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_chunk(&self, y: u8) -> Option<&SubChunk> {
        self.sub_chunks.get(&y)
    }

    /// Present sub-chunks in ascending `y`.
    pub fn sub_chunks(&self) -> impl Iterator<Item = (u8, &SubChunk)> {
        self.sub_chunks.iter().map(|(&y, sc)| (y, sc))
    }

    pub fn len(&self) -> usize {
        self.sub_chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_chunks.is_empty()
    }

    pub fn insert_sub_chunk(&mut self, y: u8, sub_chunk: SubChunk) -> Option<SubChunk> {
        self.sub_chunks.insert(y, sub_chunk)
    }

    /// Get or create an all-air sub-chunk at index `y`.
    pub fn ensure_sub_chunk(&mut self, y: u8) -> &mut SubChunk {
        self.sub_chunks.entry(y).or_default()
    }

    /// Block id at `pos`; air outside the world or in an absent sub-chunk.
    pub fn block_id(&self, pos: BlockPos) -> u8 {
        if !pos.in_world() {
            return 0;
        }
        let (x, y, z) = pos.local();
        self.sub_chunk(pos.sub_chunk_y())
            .map_or(0, |sc| sc.id(x, y, z))
    }

    /// Metadata nibble at `pos`; zero outside the world or in an absent sub-chunk.
    pub fn block_meta(&self, pos: BlockPos) -> u8 {
        if !pos.in_world() {
            return 0;
        }
        let (x, y, z) = pos.local();
        self.sub_chunk(pos.sub_chunk_y())
            .map_or(0, |sc| sc.meta(x, y, z))
    }

    pub fn set_block_id(&mut self, pos: BlockPos, id: u8) -> Result<(), PmfError> {
        let (x, y, z) = pos.local();
        self.writable(pos)?.set_id(x, y, z, id);
        Ok(())
    }

    pub fn write_meta(&mut self, pos: BlockPos, value: u8) -> Result<(), PmfError> {
        let (x, y, z) = pos.local();
        self.writable(pos)?.set_meta(x, y, z, value);
        Ok(())
    }

    /// Bit `y` set for every stored sub-chunk.
    pub fn presence_mask(&self) -> u16 {
        self.sub_chunks
            .keys()
            .filter(|&&y| y < 16)
            .fold(0, |mask, &y| mask | (1 << y))
    }

    /// Stored sub-chunks concatenated in ascending `y`, the `.pmc` payload.
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.sub_chunks.len() * SUB_CHUNK_SIZE);
        for sc in self.sub_chunks.values() {
            out.extend_from_slice(sc.as_bytes());
        }
        out
    }

    fn writable(&mut self, pos: BlockPos) -> Result<&mut SubChunk, PmfError> {
        if !pos.in_world() {
            return Err(PmfError::OutOfRange {
                x: pos.x,
                y: pos.y,
                z: pos.z,
            });
        }
        self.sub_chunks
            .get_mut(&pos.sub_chunk_y())
            .ok_or(PmfError::MissingSubChunk {
                x: pos.x,
                y: pos.y,
                z: pos.z,
            })
    }
}
