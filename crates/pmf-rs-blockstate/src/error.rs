//! Translation table errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockStateError {
    #[error("no block state for legacy id {id} meta {meta}")]
    UnmappedState { id: u8, meta: u8 },

    #[error("invalid translation table: {0}")]
    Table(#[from] serde_json::Error),

    #[error("duplicate table entry for legacy id {id} meta {meta}")]
    DuplicateEntry { id: u8, meta: u8 },

    #[error("legacy id {id} has out-of-range meta {meta}")]
    InvalidMeta { id: u8, meta: u8 },

    #[error("translation table has no minecraft:air entry for (0, 0)")]
    MissingAir,
}
