//! PMF decoding and authoring errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PmfError {
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    Truncated { needed: usize, remaining: usize },

    #[error("chunk file not found: {}", path.display())]
    ChunkNotFound { path: PathBuf },

    #[error("column ({x}, {z}) is corrupted: sub-chunk {y} needs 8192 bytes, {remaining} left")]
    Corrupted {
        x: u8,
        z: u8,
        y: u8,
        remaining: usize,
    },

    #[error("position ({x}, {y}, {z}) is outside the legacy world")]
    OutOfRange { x: i32, y: i32, z: i32 },

    #[error("no sub-chunk stored for position ({x}, {y}, {z})")]
    MissingSubChunk { x: i32, y: i32, z: i32 },

    #[error("presence table has {len} masks, world width {width} needs width²")]
    InvalidPresenceTable { width: u8, len: usize },

    #[error("sub-chunk must be 8192 bytes, got {0}")]
    InvalidSubChunkLength(usize),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("tiles.yml: {0}")]
    Tiles(#[from] serde_yaml::Error),
}

impl PmfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PmfError::Io {
            path: path.into(),
            source,
        }
    }
}
