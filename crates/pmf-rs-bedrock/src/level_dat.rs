//! `level.dat`: `[storage_version:i32_le][length:i32_le][NBT_LE]`.

use std::fs;
use std::path::Path;

use bytes::Buf;
use pmf_rs_nbt::{read_nbt_le, to_le_bytes, NbtCompound, NbtRoot, NbtTag};

use crate::error::WriteError;
use crate::writer::WorldSettings;

pub const STORAGE_VERSION: i32 = 10;

/// Void flat generator, so chunks outside the converted area stay empty.
const VOID_LAYERS: &str = r#"{"biome_id":1,"block_layers":[],"encoding_version":6,"structure_options":null,"world_version":"version.post_1_18"}"#;

const GAME_VERSION: [i32; 5] = [1, 21, 40, 0, 0];

pub fn level_dat_compound(settings: &WorldSettings) -> NbtCompound {
    let version = || NbtTag::List(GAME_VERSION.iter().map(|&v| NbtTag::Int(v)).collect());
    let (spawn_x, spawn_y, spawn_z) = settings.spawn;

    let mut c = NbtCompound::new();
    c.insert("LevelName".into(), NbtTag::String(settings.name.clone()));
    c.insert("SpawnX".into(), NbtTag::Int(spawn_x));
    c.insert("SpawnY".into(), NbtTag::Int(spawn_y));
    c.insert("SpawnZ".into(), NbtTag::Int(spawn_z));
    c.insert("Time".into(), NbtTag::Long(settings.time));
    c.insert("StorageVersion".into(), NbtTag::Int(STORAGE_VERSION));
    c.insert("NetworkVersion".into(), NbtTag::Int(748));
    c.insert("Generator".into(), NbtTag::Int(2));
    c.insert("FlatWorldLayers".into(), NbtTag::String(VOID_LAYERS.into()));
    c.insert("RandomSeed".into(), NbtTag::Long(0));
    c.insert("GameType".into(), NbtTag::Int(0));
    c.insert("Difficulty".into(), NbtTag::Int(2));
    c.insert("LastPlayed".into(), NbtTag::Long(0));
    c.insert("commandsEnabled".into(), NbtTag::bool(false));
    c.insert("lastOpenedWithVersion".into(), version());
    c.insert("MinimumCompatibleClientVersion".into(), version());
    c
}

pub fn encode_level_dat(settings: &WorldSettings) -> Vec<u8> {
    let body = to_le_bytes(&NbtRoot::unnamed(level_dat_compound(settings)));
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(&STORAGE_VERSION.to_le_bytes());
    out.extend_from_slice(&(body.len() as i32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// Write `level.dat` and `levelname.txt` into a world directory.
pub fn write_level_dat(dir: &Path, settings: &WorldSettings) -> Result<(), WriteError> {
    fs::write(dir.join("level.dat"), encode_level_dat(settings))?;
    fs::write(dir.join("levelname.txt"), &settings.name)?;
    Ok(())
}

pub fn read_level_dat(dir: &Path) -> Result<NbtRoot, WriteError> {
    let data = fs::read(dir.join("level.dat"))?;
    let mut buf = &data[..];
    if buf.remaining() < 8 {
        return Err(WriteError::InvalidData("level.dat header".into()));
    }
    let _storage_version = buf.get_i32_le();
    let len = buf.get_i32_le();
    if len < 0 || buf.remaining() < len as usize {
        return Err(WriteError::InvalidData(format!("level.dat length {len}")));
    }
    let mut body = &buf[..len as usize];
    read_nbt_le(&mut body).map_err(|e| WriteError::InvalidData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> WorldSettings {
        WorldSettings {
            name: "Old Town".into(),
            spawn: (128, 70, -3),
            time: 6000,
        }
    }

    #[test]
    fn header_and_length() {
        let data = encode_level_dat(&settings());
        assert_eq!(i32::from_le_bytes(data[0..4].try_into().unwrap()), 10);
        let len = i32::from_le_bytes(data[4..8].try_into().unwrap());
        assert_eq!(len as usize, data.len() - 8);
    }

    #[test]
    fn carries_settings() {
        let c = level_dat_compound(&settings());
        assert_eq!(c["LevelName"].as_string(), Some("Old Town"));
        assert_eq!(c["SpawnX"].as_int(), Some(128));
        assert_eq!(c["SpawnY"].as_int(), Some(70));
        assert_eq!(c["SpawnZ"].as_int(), Some(-3));
        assert_eq!(c["Time"].as_long(), Some(6000));
    }

    #[test]
    fn file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("pmf_rs_leveldat_{}", rand::random::<u64>()));
        fs::create_dir_all(&dir).unwrap();
        write_level_dat(&dir, &settings()).unwrap();
        let root = read_level_dat(&dir).unwrap();
        assert_eq!(root.compound, level_dat_compound(&settings()));
        assert_eq!(fs::read_to_string(dir.join("levelname.txt")).unwrap(), "Old Town");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn body_is_bounded_by_declared_length() {
        let dir = std::env::temp_dir().join(format!("pmf_rs_leveldat_{}", rand::random::<u64>()));
        fs::create_dir_all(&dir).unwrap();
        let mut data = encode_level_dat(&settings());
        let short = (data.len() - 8 - 1) as i32;
        data[4..8].copy_from_slice(&short.to_le_bytes());
        fs::write(dir.join("level.dat"), &data).unwrap();
        assert!(matches!(
            read_level_dat(&dir),
            Err(WriteError::InvalidData(_))
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
