//! World writer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("LevelDB: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("writer is closed")]
    Closed,
}
