//! Bedrock world directory backed by LevelDB.
//!
//! ```text
//! <dir>/level.dat
//! <dir>/levelname.txt
//! <dir>/db/          chunk records keyed by [X:i32_le][Z:i32_le][tag]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use pmf_rs_nbt::{write_nbt_le, NbtCompound, NbtRoot};
use rusty_leveldb::DB;
use tracing::debug;

use crate::chunk::{ChunkColumn, ChunkPos};
use crate::error::WriteError;
use crate::level_dat::write_level_dat;
use crate::serializer::{encode_data_3d, encode_sub_chunk};
use crate::writer::{WorldSettings, WorldWriter};

// ─── LevelDB key tags ───────────────────────────────────────────────────────

pub const TAG_DATA_3D: u8 = 0x2B;
pub const TAG_CHUNK_VERSION: u8 = 0x2C;
pub const TAG_SUB_CHUNK_PREFIX: u8 = 0x2F;
pub const TAG_BLOCK_ENTITY: u8 = 0x31;
pub const TAG_FINALIZED_STATE: u8 = 0x36;

/// Chunk format version written under [`TAG_CHUNK_VERSION`].
pub const CHUNK_VERSION: u8 = 40;

/// Finalization state "done".
const FINALIZED: i32 = 2;

// ─── Key builders ───────────────────────────────────────────────────────────

/// `[X:i32_le][Z:i32_le][tag]` (overworld, no dimension prefix).
pub fn chunk_key(pos: ChunkPos, tag: u8) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.extend_from_slice(&pos.x.to_le_bytes());
    key.extend_from_slice(&pos.z.to_le_bytes());
    key.push(tag);
    key
}

/// `[X:i32_le][Z:i32_le][0x2F][y_index]`
pub fn sub_chunk_key(pos: ChunkPos, y_index: i8) -> Vec<u8> {
    let mut key = chunk_key(pos, TAG_SUB_CHUNK_PREFIX);
    key.push(y_index as u8);
    key
}

// ─── Writer ─────────────────────────────────────────────────────────────────

pub struct LevelDbWriter {
    dir: PathBuf,
    db: Option<DB>,
}

impl LevelDbWriter {
    /// Create (or open) a world directory and its `db/` store.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let dir = dir.into();
        let db_path = dir.join("db");
        fs::create_dir_all(&db_path)?;

        let opts = rusty_leveldb::Options {
            create_if_missing: true,
            ..rusty_leveldb::Options::default()
        };
        let db = DB::open(&db_path, opts)
            .map_err(|e| WriteError::Database(format!("failed to open LevelDB: {e}")))?;
        Ok(Self { dir, db: Some(db) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Raw get, for inspecting written records.
    pub fn get_raw(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, WriteError> {
        Ok(self.db()?.get(key).map(|v| v.to_vec()))
    }

    fn db(&mut self) -> Result<&mut DB, WriteError> {
        self.db.as_mut().ok_or(WriteError::Closed)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), WriteError> {
        self.db()?
            .put(key, value)
            .map_err(|e| WriteError::Database(format!("put: {e}")))
    }
}

impl WorldWriter for LevelDbWriter {
    fn save_global_settings(&mut self, settings: &WorldSettings) -> Result<(), WriteError> {
        if self.db.is_none() {
            return Err(WriteError::Closed);
        }
        write_level_dat(&self.dir, settings)
    }

    fn save_chunk_column(&mut self, pos: ChunkPos, column: &ChunkColumn) -> Result<(), WriteError> {
        self.put(&chunk_key(pos, TAG_CHUNK_VERSION), &[CHUNK_VERSION])?;
        self.put(&chunk_key(pos, TAG_DATA_3D), &encode_data_3d(column))?;

        let mut written = 0;
        for (y_index, sub_chunk) in column.indexed_sub_chunks() {
            if sub_chunk.is_air() {
                continue;
            }
            self.put(&sub_chunk_key(pos, y_index), &encode_sub_chunk(sub_chunk, y_index))?;
            written += 1;
        }

        self.put(
            &chunk_key(pos, TAG_FINALIZED_STATE),
            &FINALIZED.to_le_bytes(),
        )?;
        debug!(x = pos.x, z = pos.z, sub_chunks = written, "wrote chunk column");
        Ok(())
    }

    fn save_block_entities(
        &mut self,
        pos: ChunkPos,
        entities: &[NbtCompound],
    ) -> Result<(), WriteError> {
        if entities.is_empty() {
            // Still reject writes after close.
            self.db()?;
            return Ok(());
        }
        let mut value = Vec::new();
        for entity in entities {
            write_nbt_le(&mut value, &NbtRoot::unnamed(entity.clone()));
        }
        self.put(&chunk_key(pos, TAG_BLOCK_ENTITY), &value)
    }

    fn close(&mut self) -> Result<(), WriteError> {
        let mut db = self.db.take().ok_or(WriteError::Closed)?;
        db.flush()
            .map_err(|e| WriteError::Database(format!("flush: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_key_bytes() {
        let key = chunk_key(ChunkPos::new(1, -1), TAG_CHUNK_VERSION);
        assert_eq!(key, vec![1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0x2C]);
    }

    #[test]
    fn sub_chunk_key_negative_y() {
        let key = sub_chunk_key(ChunkPos::new(0, 0), -4);
        assert_eq!(key.len(), 10);
        assert_eq!(key[8], 0x2F);
        assert_eq!(key[9], 0xFC);
    }
}
