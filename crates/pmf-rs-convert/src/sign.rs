//! Legacy sign tiles to Bedrock sign block entities.

use pmf_rs_format::TileRecord;
use pmf_rs_nbt::{NbtCompound, NbtTag};

pub const SIGN_ID: &str = "Sign";

/// Opaque black, legacy signs had no dyed text.
pub const SIGN_TEXT_COLOR: i32 = -0x0100_0000;

/// Merge `Text1`..`Text4` with newlines and add the fixed styling flags.
pub fn sign_block_entity(tile: &TileRecord) -> NbtCompound {
    let text = tile.sign_lines().join("\n");

    let mut c = NbtCompound::new();
    c.insert("id".into(), NbtTag::String(SIGN_ID.into()));
    c.insert("x".into(), NbtTag::Int(tile.x));
    c.insert("y".into(), NbtTag::Int(tile.y));
    c.insert("z".into(), NbtTag::Int(tile.z));
    c.insert("Text".into(), NbtTag::String(text));
    c.insert("SignTextColor".into(), NbtTag::Int(SIGN_TEXT_COLOR));
    c.insert("IgnoreLighting".into(), NbtTag::bool(false));
    c.insert("TextIgnoreLegacyBugResolved".into(), NbtTag::bool(false));
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmf_rs_format::BlockPos;

    #[test]
    fn merges_four_lines() {
        let tile = TileRecord::new("Sign", BlockPos::new(10, 64, -5))
            .with_field("Text1", "A")
            .with_field("Text2", "B")
            .with_field("Text3", "C")
            .with_field("Text4", "D");
        let nbt = sign_block_entity(&tile);
        assert_eq!(nbt["Text"].as_string(), Some("A\nB\nC\nD"));
        assert_eq!(nbt["id"].as_string(), Some("Sign"));
        assert_eq!(nbt["x"].as_int(), Some(10));
        assert_eq!(nbt["y"].as_int(), Some(64));
        assert_eq!(nbt["z"].as_int(), Some(-5));
        assert_eq!(nbt["SignTextColor"].as_int(), Some(-16_777_216));
        assert_eq!(nbt["IgnoreLighting"].as_byte(), Some(0));
        assert_eq!(nbt["TextIgnoreLegacyBugResolved"].as_byte(), Some(0));
    }

    #[test]
    fn missing_lines_are_empty() {
        let tile = TileRecord::new("Sign", BlockPos::new(0, 0, 0)).with_field("Text2", "mid");
        let nbt = sign_block_entity(&tile);
        assert_eq!(nbt["Text"].as_string(), Some("\nmid\n\n"));
    }
}
