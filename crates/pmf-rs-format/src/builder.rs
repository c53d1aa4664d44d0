//! Authoring PMF worlds on disk, for fixtures and tooling.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::column::ChunkColumn;
use crate::cursor::ByteWriter;
use crate::error::PmfError;
use crate::header::{LevelHeader, SpawnPoint};
use crate::level::LEVEL_FILE;
use crate::pos::{BlockPos, WORLD_HEIGHT};
use crate::store::chunk_file_path;
use crate::tiles::{write_tiles, TileRecord};

/// Collects columns and tiles, then writes `level.pmf`, `chunks/` and `tiles.yml`.
#[derive(Debug)]
pub struct LevelBuilder {
    header: LevelHeader,
    columns: BTreeMap<(i32, i32), ChunkColumn>,
    tiles: Vec<TileRecord>,
}

impl LevelBuilder {
    /// A 16×16-column world, eight sub-chunks high.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: LevelHeader::new(name, 16, (WORLD_HEIGHT >> 4) as u8),
            columns: BTreeMap::new(),
            tiles: Vec::new(),
        }
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.header.seed = seed;
        self
    }

    pub fn time(mut self, time: u32) -> Self {
        self.header.time = time;
        self
    }

    pub fn spawn(mut self, x: f32, y: f32, z: f32) -> Self {
        self.header.spawn = SpawnPoint::new(x, y, z);
        self
    }

    pub fn version(mut self, version: u8) -> Self {
        self.header.version = version;
        self
    }

    pub fn header(&self) -> &LevelHeader {
        &self.header
    }

    /// Authored column `(cx, cz)`, created empty on first access.
    pub fn column_mut(&mut self, cx: i32, cz: i32) -> Result<&mut ChunkColumn, PmfError> {
        let width = self.header.width as i32;
        if !(0..width).contains(&cx) || !(0..width).contains(&cz) {
            return Err(PmfError::OutOfRange {
                x: cx << 4,
                y: 0,
                z: cz << 4,
            });
        }
        Ok(self.columns.entry((cx, cz)).or_default())
    }

    /// Set id and metadata at `pos`, allocating the sub-chunk if needed.
    pub fn set_block(&mut self, pos: BlockPos, id: u8, meta: u8) -> Result<(), PmfError> {
        if !pos.in_world() {
            return Err(PmfError::OutOfRange {
                x: pos.x,
                y: pos.y,
                z: pos.z,
            });
        }
        let (cx, cz) = pos.column();
        let column = self.column_mut(cx, cz)?;
        column.ensure_sub_chunk(pos.sub_chunk_y());
        column.set_block_id(pos, id)?;
        column.write_meta(pos, meta)
    }

    pub fn add_tile(&mut self, tile: TileRecord) {
        self.tiles.push(tile);
    }

    /// Write the world under `dir`, creating directories as needed.
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<LevelHeader, PmfError> {
        let dir = dir.as_ref();
        let chunks_dir = dir.join("chunks");
        fs::create_dir_all(&chunks_dir).map_err(|e| PmfError::io(&chunks_dir, e))?;

        let mut header = self.header.clone();
        for (&(cx, cz), column) in &self.columns {
            let mask = column.presence_mask();
            header.presence.set_mask(cx, cz, mask)?;
            if mask == 0 {
                continue;
            }
            let path = dir.join(chunk_file_path(cx, cz));
            write_gzip(&path, &column.encode_payload())?;
            debug!(cx, cz, mask, "wrote chunk column");
        }

        let mut out = ByteWriter::new();
        header.encode(&mut out);
        let path = dir.join(LEVEL_FILE);
        fs::write(&path, out.freeze()).map_err(|e| PmfError::io(&path, e))?;

        write_tiles(dir, &self.tiles)?;
        Ok(header)
    }
}

/// Gzip `payload` into `path`.
pub fn write_gzip(path: &Path, payload: &[u8]) -> Result<(), PmfError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(payload)
        .map_err(|e| PmfError::io(path, e))?;
    let compressed = encoder.finish().map_err(|e| PmfError::io(path, e))?;
    fs::write(path, compressed).map_err(|e| PmfError::io(path, e))
}
