//! The contract between the converter and a world storage backend.

use pmf_rs_nbt::NbtCompound;

use crate::chunk::{ChunkColumn, ChunkPos};
use crate::error::WriteError;

/// World-level values carried over from the source world.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorldSettings {
    pub name: String,
    /// Spawn in block coordinates.
    pub spawn: (i32, i32, i32),
    /// World time in ticks.
    pub time: i64,
}

/// Receives fully built chunks, block entities and settings.
///
/// Calls after [`WorldWriter::close`] fail with [`WriteError::Closed`].
pub trait WorldWriter {
    fn save_global_settings(&mut self, settings: &WorldSettings) -> Result<(), WriteError>;

    fn save_chunk_column(&mut self, pos: ChunkPos, column: &ChunkColumn) -> Result<(), WriteError>;

    fn save_block_entities(
        &mut self,
        pos: ChunkPos,
        entities: &[NbtCompound],
    ) -> Result<(), WriteError>;

    /// Flush and release the backend.
    fn close(&mut self) -> Result<(), WriteError>;
}
