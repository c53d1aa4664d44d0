//! Lazy loading and caching of chunk columns from `chunks/<z>.<x>.pmc`.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::column::ChunkColumn;
use crate::cursor::ByteCursor;
use crate::error::PmfError;
use crate::header::PresenceTable;
use crate::sub_chunk::{SubChunk, SUB_CHUNK_SIZE};

/// Columns along each axis addressable by the cache index.
const COLUMNS_PER_AXIS: i32 = 16;

// ─── Paths and indices ──────────────────────────────────────────────────────

/// `chunks/<z>.<x>.pmc`, relative to the world directory.
pub fn chunk_file_path(cx: i32, cz: i32) -> PathBuf {
    Path::new("chunks").join(format!("{cz}.{cx}.pmc"))
}

/// Cache key for column `(cx, cz)`.
#[inline]
pub fn column_index(cx: i32, cz: i32) -> usize {
    ((cz << 4) + cx) as usize
}

// ─── Store ──────────────────────────────────────────────────────────────────

/// Owns the per-session column cache. Dropped or cleared on close.
#[derive(Debug)]
pub struct SubChunkStore {
    root: PathBuf,
    presence: PresenceTable,
    height: u8,
    cache: HashMap<usize, ChunkColumn>,
    empty: ChunkColumn,
}

impl SubChunkStore {
    pub fn new(root: impl Into<PathBuf>, presence: PresenceTable, height: u8) -> Self {
        Self {
            root: root.into(),
            presence,
            height,
            cache: HashMap::new(),
            empty: ChunkColumn::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cached_columns(&self) -> usize {
        self.cache.len()
    }

    /// Load column `(cx, cz)`, reading its file on the first access only.
    ///
    /// Columns outside the presence table, or whose mask is zero, are all air
    /// and never touch the filesystem.
    pub fn load(&mut self, cx: i32, cz: i32) -> Result<&ChunkColumn, PmfError> {
        let in_range = (0..COLUMNS_PER_AXIS).contains(&cx) && (0..COLUMNS_PER_AXIS).contains(&cz);
        let mask = match self.presence.mask(cx, cz) {
            Some(mask) if in_range && mask != 0 => mask,
            _ => return Ok(&self.empty),
        };

        let index = column_index(cx, cz);
        if !self.cache.contains_key(&index) {
            let column = self.read_column(cx, cz, mask)?;
            debug!(
                cx,
                cz,
                index,
                sub_chunks = column.len(),
                "loaded chunk column"
            );
            self.cache.insert(index, column);
        }
        Ok(&self.cache[&index])
    }

    /// Drop every cached column.
    pub fn close(&mut self) {
        self.cache.clear();
    }

    fn read_column(&self, cx: i32, cz: i32, mask: u16) -> Result<ChunkColumn, PmfError> {
        let path = self.root.join(chunk_file_path(cx, cz));
        let compressed = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PmfError::ChunkNotFound { path: path.clone() },
            _ => PmfError::io(&path, e),
        })?;

        let mut payload = Vec::with_capacity(mask.count_ones() as usize * SUB_CHUNK_SIZE);
        GzDecoder::new(&compressed[..])
            .read_to_end(&mut payload)
            .map_err(|e| PmfError::io(&path, e))?;

        let column = split_sub_chunks(cx, cz, mask, self.height, payload)?;
        Ok(column)
    }
}

/// Split a decompressed `.pmc` payload by presence mask, in ascending `y`.
pub fn split_sub_chunks(
    cx: i32,
    cz: i32,
    mask: u16,
    height: u8,
    payload: Vec<u8>,
) -> Result<ChunkColumn, PmfError> {
    let mut cursor = ByteCursor::new(payload);
    let mut column = ChunkColumn::new();

    for y in 0..height.min(16) {
        if mask & (1 << y) == 0 {
            continue;
        }
        let remaining = cursor.remaining();
        let data = cursor.next(SUB_CHUNK_SIZE).map_err(|_| PmfError::Corrupted {
            x: cx as u8,
            z: cz as u8,
            y,
            remaining,
        })?;
        column.insert_sub_chunk(y, SubChunk::from_slice(&data)?);
    }

    if cursor.remaining() > 0 {
        warn!(
            cx,
            cz,
            trailing = cursor.remaining(),
            "ignoring bytes after the last present sub-chunk"
        );
    }
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_chunk_bytes(fill: u8) -> Vec<u8> {
        vec![fill; SUB_CHUNK_SIZE]
    }

    #[test]
    fn path_is_z_then_x() {
        assert_eq!(chunk_file_path(3, 7), Path::new("chunks/7.3.pmc"));
    }

    #[test]
    fn cache_index() {
        assert_eq!(column_index(0, 0), 0);
        assert_eq!(column_index(3, 2), 35);
        assert_eq!(column_index(15, 15), 255);
    }

    #[test]
    fn mask_selects_sub_chunks_in_order() {
        let mut payload = sub_chunk_bytes(1);
        payload.extend(sub_chunk_bytes(2));
        let column = split_sub_chunks(0, 0, 0b101, 8, payload).unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column.sub_chunk(0).unwrap().as_bytes()[0], 1);
        assert_eq!(column.sub_chunk(2).unwrap().as_bytes()[0], 2);
        assert!(column.sub_chunk(1).is_none());
    }

    #[test]
    fn short_payload_is_corruption() {
        let payload = sub_chunk_bytes(1);
        match split_sub_chunks(4, 5, 0b11, 8, payload) {
            Err(PmfError::Corrupted { x, z, y, remaining }) => {
                assert_eq!((x, z, y, remaining), (4, 5, 1, 0));
            }
            other => panic!("expected Corrupted, got {other:?}"),
        }
    }

    #[test]
    fn bits_above_height_are_ignored() {
        let column = split_sub_chunks(0, 0, 0b1_0000_0001, 8, sub_chunk_bytes(0)).unwrap();
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn trailing_bytes_are_not_an_error() {
        let mut payload = sub_chunk_bytes(3);
        payload.extend([0u8; 10]);
        let column = split_sub_chunks(0, 0, 0b1, 8, payload).unwrap();
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn absent_column_skips_the_filesystem() {
        let root = std::env::temp_dir().join(format!("pmf_rs_missing_{}", rand::random::<u64>()));
        let mut store = SubChunkStore::new(&root, PresenceTable::new(2), 8);
        assert!(store.load(0, 0).unwrap().is_empty());
        assert!(store.load(5, 5).unwrap().is_empty());
        assert_eq!(store.cached_columns(), 0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let root = std::env::temp_dir().join(format!("pmf_rs_missing_{}", rand::random::<u64>()));
        let presence = PresenceTable::from_masks(1, vec![1]).unwrap();
        let mut store = SubChunkStore::new(&root, presence, 8);
        assert!(matches!(
            store.load(0, 0),
            Err(PmfError::ChunkNotFound { .. })
        ));
    }
}
