//! Decoder for the legacy PMF world format.
//!
//! A world directory holds `level.pmf` (header and sub-chunk presence table),
//! gzip-compressed `chunks/<z>.<x>.pmc` column files and an optional
//! `tiles.yml` with block entities. [`Level`] ties them together and loads
//! columns lazily; [`LevelBuilder`] writes the same layout back out.

pub mod builder;
pub mod column;
pub mod cursor;
pub mod error;
pub mod header;
pub mod level;
pub mod pos;
pub mod store;
pub mod sub_chunk;
pub mod tiles;

pub use builder::LevelBuilder;
pub use column::ChunkColumn;
pub use cursor::{ByteCursor, ByteWriter};
pub use error::PmfError;
pub use header::{LevelHeader, PresenceTable, SpawnPoint};
pub use level::Level;
pub use pos::{BlockPos, WORLD_HEIGHT, WORLD_SIZE};
pub use store::SubChunkStore;
pub use sub_chunk::{id_index, meta_index, SubChunk, SUB_CHUNK_SIZE};
pub use tiles::TileRecord;
