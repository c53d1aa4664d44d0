//! Bedrock world output: the target chunk model, its on-disk encodings and
//! the [`WorldWriter`] backends.

pub mod chunk;
pub mod error;
pub mod level_dat;
pub mod leveldb;
pub mod memory;
pub mod palette;
pub mod serializer;
pub mod writer;

pub use chunk::{ChunkColumn, ChunkPos, SubChunk, MIN_Y, PLAINS_BIOME, SUB_CHUNK_COUNT};
pub use error::WriteError;
pub use leveldb::LevelDbWriter;
pub use memory::MemoryWriter;
pub use writer::{WorldSettings, WorldWriter};
