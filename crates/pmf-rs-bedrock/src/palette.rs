//! Block state palette entries as little-endian NBT compounds.

use std::collections::BTreeMap;

use pmf_rs_blockstate::{CanonicalBlockState, StateValue};
use pmf_rs_nbt::{NbtCompound, NbtRoot, NbtTag};

/// Block state version for 1.21.40+.
pub const BLOCK_STATE_VERSION: i32 = 18_100_737;

/// `{name, states, version}` as stored in sub-chunk palettes.
pub fn state_to_nbt(state: &CanonicalBlockState) -> NbtRoot {
    let states: NbtCompound = state
        .properties
        .iter()
        .map(|(k, v)| {
            let tag = match v {
                StateValue::Int(i) => NbtTag::Int(*i),
                StateValue::Byte(b) => NbtTag::Byte(*b),
                StateValue::Str(s) => NbtTag::String(s.clone()),
            };
            (k.clone(), tag)
        })
        .collect();

    let mut compound = NbtCompound::new();
    compound.insert("name".into(), NbtTag::String(state.name.clone()));
    compound.insert("states".into(), NbtTag::Compound(states));
    compound.insert("version".into(), NbtTag::Int(BLOCK_STATE_VERSION));
    NbtRoot::unnamed(compound)
}

/// Inverse of [`state_to_nbt`]. Unsupported property tag types yield `None`.
pub fn nbt_to_state(root: &NbtRoot) -> Option<CanonicalBlockState> {
    let name = root.compound.get("name")?.as_string()?.to_string();
    let mut properties = BTreeMap::new();
    if let Some(states) = root.compound.get("states").and_then(NbtTag::as_compound) {
        for (key, tag) in states {
            let value = match tag {
                NbtTag::Int(i) => StateValue::Int(*i),
                NbtTag::Byte(b) => StateValue::Byte(*b),
                NbtTag::String(s) => StateValue::Str(s.clone()),
                _ => return None,
            };
            properties.insert(key.clone(), value);
        }
    }
    Some(CanonicalBlockState { name, properties })
}
