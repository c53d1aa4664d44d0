//! A [`WorldWriter`] that keeps everything in memory.

use std::collections::BTreeMap;

use pmf_rs_nbt::NbtCompound;

use crate::chunk::{ChunkColumn, ChunkPos};
use crate::error::WriteError;
use crate::writer::{WorldSettings, WorldWriter};

#[derive(Debug, Default)]
pub struct MemoryWriter {
    settings: Option<WorldSettings>,
    columns: BTreeMap<ChunkPos, ChunkColumn>,
    block_entities: BTreeMap<ChunkPos, Vec<NbtCompound>>,
    /// Columns in the order they were saved.
    order: Vec<ChunkPos>,
    closed: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> Option<&WorldSettings> {
        self.settings.as_ref()
    }

    pub fn column(&self, pos: ChunkPos) -> Option<&ChunkColumn> {
        self.columns.get(&pos)
    }

    pub fn columns(&self) -> &BTreeMap<ChunkPos, ChunkColumn> {
        &self.columns
    }

    pub fn block_entities(&self, pos: ChunkPos) -> &[NbtCompound] {
        self.block_entities.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn save_order(&self) -> &[ChunkPos] {
        &self.order
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_open(&self) -> Result<(), WriteError> {
        if self.closed {
            return Err(WriteError::Closed);
        }
        Ok(())
    }
}

impl WorldWriter for MemoryWriter {
    fn save_global_settings(&mut self, settings: &WorldSettings) -> Result<(), WriteError> {
        self.check_open()?;
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn save_chunk_column(&mut self, pos: ChunkPos, column: &ChunkColumn) -> Result<(), WriteError> {
        self.check_open()?;
        self.columns.insert(pos, column.clone());
        self.order.push(pos);
        Ok(())
    }

    fn save_block_entities(
        &mut self,
        pos: ChunkPos,
        entities: &[NbtCompound],
    ) -> Result<(), WriteError> {
        self.check_open()?;
        if !entities.is_empty() {
            self.block_entities.insert(pos, entities.to_vec());
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriteError> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }
}
