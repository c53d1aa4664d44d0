//! PMF to Bedrock world conversion.
//!
//! [`convert`] walks every voxel of an opened [`Level`], translates non-air
//! pairs through a [`BlockStateMapper`] and hands finished chunk columns and
//! sign block entities to a [`WorldWriter`].

pub mod config;
pub mod error;
pub mod sign;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use pmf_rs_bedrock::{ChunkColumn, ChunkPos, WorldSettings, WorldWriter, PLAINS_BIOME};
use pmf_rs_blockstate::{BlockStateMapper, LegacyVoxelKey};
use pmf_rs_format::{BlockPos, Level, WORLD_HEIGHT, WORLD_SIZE};
use pmf_rs_nbt::NbtCompound;
use tracing::{debug, info, warn};

pub use config::ConverterConfig;
pub use error::ConvertError;
pub use sign::sign_block_entity;

/// Counters reported after a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub columns_written: usize,
    pub blocks_converted: u64,
    /// Voxels whose pair had no table entry and became air.
    pub unmapped_voxels: u64,
    pub block_entities: usize,
    /// Signs whose column held no blocks, so nothing was written for them.
    pub orphaned_tiles: usize,
    /// Tiles of kinds other than signs.
    pub ignored_tiles: usize,
}

impl fmt::Display for ConvertStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} columns, {} blocks, {} block entities",
            self.columns_written, self.blocks_converted, self.block_entities
        )?;
        if self.unmapped_voxels > 0 {
            write!(f, ", {} unmapped voxels", self.unmapped_voxels)?;
        }
        if self.orphaned_tiles + self.ignored_tiles > 0 {
            write!(
                f,
                ", {} tiles skipped",
                self.orphaned_tiles + self.ignored_tiles
            )?;
        }
        Ok(())
    }
}

/// Convert `level` into `writer`.
///
/// Settings are saved first, then each non-empty column in ascending
/// `(x, z)` order followed by its block entities. The writer is left open.
pub fn convert<W: WorldWriter>(
    level: &mut Level,
    mapper: &BlockStateMapper,
    writer: &mut W,
) -> Result<ConvertStats, ConvertError> {
    let header = level.header();
    info!(name = %header.name, "converting PMF level");

    writer.save_global_settings(&WorldSettings {
        name: header.name.clone(),
        spawn: header.spawn.block_pos(),
        time: i64::from(header.time),
    })?;

    let mut stats = ConvertStats::default();
    let mut columns: BTreeMap<ChunkPos, ChunkColumn> = BTreeMap::new();
    let mut reported: HashSet<LegacyVoxelKey> = HashSet::new();

    for x in 0..WORLD_SIZE {
        if x % 16 == 0 {
            debug!(x, "converting column strip");
        }
        for z in 0..WORLD_SIZE {
            let source = level.column(x >> 4, z >> 4)?;
            for y in 0..WORLD_HEIGHT {
                let pos = BlockPos::new(x, y, z);
                let id = source.block_id(pos);
                let meta = source.block_meta(pos);
                // (0, 0) is always air in a valid table.
                if id == 0 && meta == 0 {
                    continue;
                }

                let state = match mapper.lookup(id, meta) {
                    Some(state) => state,
                    None => {
                        let key = LegacyVoxelKey { id, meta };
                        let state = mapper.fallback(key)?;
                        stats.unmapped_voxels += 1;
                        if reported.insert(key) {
                            warn!(%key, %pos, "no block state for legacy pair, writing air");
                        }
                        state
                    }
                };
                if state.is_air() {
                    continue;
                }

                let column = columns
                    .entry(ChunkPos::containing(x, z))
                    .or_insert_with(|| ChunkColumn::new(mapper.air(), PLAINS_BIOME));
                column.set_block((x & 0xF) as usize, y, (z & 0xF) as usize, state);
                stats.blocks_converted += 1;
            }
        }
    }

    let mut entities: BTreeMap<ChunkPos, Vec<NbtCompound>> = BTreeMap::new();
    for tile in level.tiles() {
        if tile.id != sign::SIGN_ID {
            debug!(id = %tile.id, pos = %tile.pos(), "skipping unsupported tile");
            stats.ignored_tiles += 1;
            continue;
        }
        entities
            .entry(ChunkPos::containing(tile.x, tile.z))
            .or_default()
            .push(sign_block_entity(tile));
    }

    for (pos, column) in &columns {
        writer.save_chunk_column(*pos, column)?;
        let chunk_entities = entities.remove(pos).unwrap_or_default();
        writer.save_block_entities(*pos, &chunk_entities)?;
        stats.columns_written += 1;
        stats.block_entities += chunk_entities.len();
    }

    for (pos, orphans) in entities {
        warn!(chunk = %pos, count = orphans.len(), "block entities in a column without blocks, dropped");
        stats.orphaned_tiles += orphans.len();
    }

    info!(%stats, "conversion finished");
    Ok(stats)
}
