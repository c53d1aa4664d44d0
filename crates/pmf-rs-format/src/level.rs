//! An opened PMF world: header, tile list and the column store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::column::ChunkColumn;
use crate::cursor::ByteCursor;
use crate::error::PmfError;
use crate::header::LevelHeader;
use crate::pos::BlockPos;
use crate::store::SubChunkStore;
use crate::tiles::{load_tiles, TileRecord};

pub const LEVEL_FILE: &str = "level.pmf";

#[derive(Debug)]
pub struct Level {
    header: LevelHeader,
    tiles: Vec<TileRecord>,
    store: SubChunkStore,
}

impl Level {
    /// Decode `level.pmf` and `tiles.yml` under `dir`. Chunk files are read lazily.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PmfError> {
        let dir = dir.as_ref();
        let path = dir.join(LEVEL_FILE);
        let bytes = fs::read(&path).map_err(|e| PmfError::io(&path, e))?;
        let header = LevelHeader::decode(&mut ByteCursor::new(bytes))?;
        let tiles = load_tiles(dir)?;

        info!(
            name = %header.name,
            version = header.version,
            width = header.width,
            height = header.height,
            tiles = tiles.len(),
            "opened PMF level"
        );

        let store = SubChunkStore::new(dir, header.presence.clone(), header.height);
        Ok(Self {
            header,
            tiles,
            store,
        })
    }

    pub fn header(&self) -> &LevelHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn root(&self) -> PathBuf {
        self.store.root().to_path_buf()
    }

    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn column(&mut self, cx: i32, cz: i32) -> Result<&ChunkColumn, PmfError> {
        self.store.load(cx, cz)
    }

    /// Block id at `pos`. Positions outside the world are air and load nothing.
    pub fn block_id(&mut self, pos: BlockPos) -> Result<u8, PmfError> {
        if !pos.in_world() {
            return Ok(0);
        }
        let (cx, cz) = pos.column();
        Ok(self.store.load(cx, cz)?.block_id(pos))
    }

    pub fn block_meta(&mut self, pos: BlockPos) -> Result<u8, PmfError> {
        if !pos.in_world() {
            return Ok(0);
        }
        let (cx, cz) = pos.column();
        Ok(self.store.load(cx, cz)?.block_meta(pos))
    }

    /// Drop the column cache and release the level.
    pub fn close(mut self) {
        self.store.close();
    }
}
