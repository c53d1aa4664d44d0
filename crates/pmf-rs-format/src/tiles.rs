//! `tiles.yml`: the block-entity list stored next to `level.pmf`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::warn;

use crate::error::PmfError;
use crate::pos::BlockPos;

pub const TILES_FILE: &str = "tiles.yml";

/// One tile entry. Fields beyond `id` and the position are kept untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl TileRecord {
    pub fn new(id: impl Into<String>, pos: BlockPos) -> Self {
        Self {
            id: id.into(),
            x: pos.x,
            y: pos.y,
            z: pos.z,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn pos(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    /// Scalar field rendered as text; empty when absent or not a scalar.
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// `Text1` to `Text4` of a sign.
    pub fn sign_lines(&self) -> [String; 4] {
        ["Text1", "Text2", "Text3", "Text4"].map(|key| self.text(key))
    }
}

/// Read `tiles.yml` from a world directory. A missing file is an empty list.
pub fn load_tiles(dir: &Path) -> Result<Vec<TileRecord>, PmfError> {
    let path = dir.join(TILES_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "no tiles.yml, world has no block entities");
            return Ok(Vec::new());
        }
        Err(e) => return Err(PmfError::io(&path, e)),
    };
    parse_tiles(&text)
}

pub fn parse_tiles(text: &str) -> Result<Vec<TileRecord>, PmfError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let tiles: Option<Vec<TileRecord>> = serde_yaml::from_str(text)?;
    Ok(tiles.unwrap_or_default())
}

pub fn write_tiles(dir: &Path, tiles: &[TileRecord]) -> Result<(), PmfError> {
    let path = dir.join(TILES_FILE);
    let text = serde_yaml::to_string(tiles)?;
    fs::write(&path, text).map_err(|e| PmfError::io(&path, e))
}
