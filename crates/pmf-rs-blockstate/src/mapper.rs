//! Legacy `(id, meta)` to modern block state lookup.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::error::BlockStateError;
use crate::legacy::LegacyVoxelKey;
use crate::state::{CanonicalBlockState, StateValue};

/// The table shipped with the crate.
const BUNDLED_TABLE: &str = include_str!("../data/legacy_states.json");

/// What to do with a pair the table has no entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Fail with [`BlockStateError::UnmappedState`].
    #[default]
    Error,
    /// Substitute the table's air state.
    Air,
}

#[derive(Deserialize)]
struct TableEntry {
    id: u8,
    meta: u8,
    name: String,
    #[serde(default)]
    states: BTreeMap<String, StateValue>,
}

/// A finite translation table with an explicit fallback for missing pairs.
#[derive(Debug, Clone)]
pub struct BlockStateMapper {
    entries: HashMap<LegacyVoxelKey, CanonicalBlockState>,
    air: CanonicalBlockState,
    policy: UnmappedPolicy,
}

impl BlockStateMapper {
    /// Parse the bundled table.
    pub fn bundled() -> Result<Self, BlockStateError> {
        Self::from_json_str(BUNDLED_TABLE)
    }

    /// Parse a JSON array of `{id, meta, name, states}` entries.
    ///
    /// The table must map `(0, 0)` to `minecraft:air`.
    pub fn from_json_str(json: &str) -> Result<Self, BlockStateError> {
        let raw: Vec<TableEntry> = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(raw.len());

        for entry in raw {
            let key = LegacyVoxelKey::new(entry.id, entry.meta).ok_or(
                BlockStateError::InvalidMeta {
                    id: entry.id,
                    meta: entry.meta,
                },
            )?;
            let state = CanonicalBlockState {
                name: entry.name,
                properties: entry.states,
            };
            if entries.insert(key, state).is_some() {
                return Err(BlockStateError::DuplicateEntry {
                    id: key.id,
                    meta: key.meta,
                });
            }
        }

        let air = match entries.get(&LegacyVoxelKey::AIR) {
            Some(state) if state.is_air() => state.clone(),
            _ => return Err(BlockStateError::MissingAir),
        };

        Ok(Self {
            entries,
            air,
            policy: UnmappedPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: UnmappedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnmappedPolicy {
        self.policy
    }

    pub fn air(&self) -> &CanonicalBlockState {
        &self.air
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table entry for `(id, meta)`, without applying the policy.
    pub fn lookup(&self, id: u8, meta: u8) -> Option<&CanonicalBlockState> {
        self.entries.get(&LegacyVoxelKey { id, meta })
    }

    /// Apply the unmapped policy to a key the table does not know.
    pub fn fallback(&self, key: LegacyVoxelKey) -> Result<&CanonicalBlockState, BlockStateError> {
        match self.policy {
            UnmappedPolicy::Error => Err(BlockStateError::UnmappedState {
                id: key.id,
                meta: key.meta,
            }),
            UnmappedPolicy::Air => Ok(&self.air),
        }
    }

    pub fn resolve(&self, id: u8, meta: u8) -> Result<&CanonicalBlockState, BlockStateError> {
        match self.lookup(id, meta) {
            Some(state) => Ok(state),
            None => self.fallback(LegacyVoxelKey { id, meta }),
        }
    }
}
