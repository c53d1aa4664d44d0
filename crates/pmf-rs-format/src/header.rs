//! `level.pmf`: the world metadata record and the sub-chunk presence table.
//!
//! Layout (big-endian):
//!
//! ```text
//! magic[5] version:u8 name:str16 seed:u32 time:u32 spawn:f32×3
//! width:u8 height:u8 extra_len:u16 extra[extra_len] masks:u16×(width²)
//! ```

use tracing::warn;

use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::PmfError;

/// Prefix written when authoring a level.
pub const PMF_MAGIC: [u8; 5] = *b"PMF\x01\x00";

/// Spawn point as stored: three single-precision floats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SpawnPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Truncate toward zero into block coordinates.
    pub fn block_pos(&self) -> (i32, i32, i32) {
        (self.x as i32, self.y as i32, self.z as i32)
    }
}

/// Per-column sub-chunk presence masks, flattened as `z * width + x`.
///
/// Bit `y` of a mask means sub-chunk `y` is stored in the column's file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceTable {
    width: u8,
    masks: Vec<u16>,
}

impl PresenceTable {
    /// All-zero table for a `width × width` world.
    pub fn new(width: u8) -> Self {
        let count = width as usize * width as usize;
        Self {
            width,
            masks: vec![0; count],
        }
    }

    pub fn from_masks(width: u8, masks: Vec<u16>) -> Result<Self, PmfError> {
        if masks.len() != width as usize * width as usize {
            return Err(PmfError::InvalidPresenceTable {
                width,
                len: masks.len(),
            });
        }
        Ok(Self { width, masks })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn masks(&self) -> &[u16] {
        &self.masks
    }

    /// Mask for column `(cx, cz)`, or `None` when the column is outside the table.
    pub fn mask(&self, cx: i32, cz: i32) -> Option<u16> {
        let index = self.index(cx, cz)?;
        self.masks.get(index).copied()
    }

    pub fn set_mask(&mut self, cx: i32, cz: i32, mask: u16) -> Result<(), PmfError> {
        let index = self.index(cx, cz).ok_or(PmfError::OutOfRange {
            x: cx << 4,
            y: 0,
            z: cz << 4,
        })?;
        self.masks[index] = mask;
        Ok(())
    }

    fn index(&self, cx: i32, cz: i32) -> Option<usize> {
        let width = self.width as i32;
        if !(0..width).contains(&cx) || !(0..width).contains(&cz) {
            return None;
        }
        Some((cz * width + cx) as usize)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelHeader {
    pub version: u8,
    pub name: String,
    pub seed: u32,
    pub time: u32,
    pub spawn: SpawnPoint,
    /// World size in chunk columns along each horizontal axis.
    pub width: u8,
    /// Highest sub-chunk index plus one.
    pub height: u8,
    pub presence: PresenceTable,
}

impl LevelHeader {
    /// A fresh header with an all-zero presence table.
    pub fn new(name: impl Into<String>, width: u8, height: u8) -> Self {
        Self {
            version: 0,
            name: name.into(),
            seed: 0,
            time: 0,
            spawn: SpawnPoint::default(),
            width,
            height,
            presence: PresenceTable::new(width),
        }
    }

    pub fn decode(cursor: &mut ByteCursor) -> Result<Self, PmfError> {
        let magic = cursor.next(PMF_MAGIC.len())?;
        if &magic[..3] != b"PMF" {
            warn!(magic = ?&magic[..], "level.pmf does not start with the PMF magic");
        }

        let version = cursor.read_u8()?;
        let name = cursor.read_string()?;
        let seed = cursor.read_u32()?;
        let time = cursor.read_u32()?;
        let spawn = SpawnPoint {
            x: cursor.read_f32()?,
            y: cursor.read_f32()?,
            z: cursor.read_f32()?,
        };
        let width = cursor.read_u8()?;
        let height = cursor.read_u8()?;

        let extra_len = cursor.read_u16()? as usize;
        cursor.skip(extra_len)?;

        let count = width as usize * width as usize;
        let mut masks = Vec::with_capacity(count);
        for _ in 0..count {
            masks.push(cursor.read_u16()?);
        }

        Ok(Self {
            version,
            name,
            seed,
            time,
            spawn,
            width,
            height,
            presence: PresenceTable::from_masks(width, masks)?,
        })
    }

    pub fn encode(&self, out: &mut ByteWriter) {
        out.put_slice(&PMF_MAGIC);
        out.put_u8(self.version);
        out.put_string(&self.name);
        out.put_u32(self.seed);
        out.put_u32(self.time);
        out.put_f32(self.spawn.x);
        out.put_f32(self.spawn.y);
        out.put_f32(self.spawn.z);
        out.put_u8(self.width);
        out.put_u8(self.height);
        out.put_u16(0);
        for &mask in self.presence.masks() {
            out.put_u16(mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LevelHeader {
        let mut header = LevelHeader::new("Legacy World", 16, 8);
        header.version = 2;
        header.seed = 0xDEAD_BEEF;
        header.time = 24_000;
        header.spawn = SpawnPoint::new(128.5, 64.0, -3.75);
        header
    }

    fn encode(header: &LevelHeader) -> ByteWriter {
        let mut out = ByteWriter::new();
        header.encode(&mut out);
        out
    }

    #[test]
    fn roundtrip() {
        let header = sample();
        let mut cursor = ByteCursor::new(encode(&header).freeze());
        assert_eq!(LevelHeader::decode(&mut cursor).unwrap(), header);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn encoded_size() {
        // 5 magic + 1 version + 2+12 name + 4 seed + 4 time + 12 spawn
        // + 2 width/height + 2 extra + 256×2 masks
        assert_eq!(encode(&sample()).len(), 5 + 1 + 14 + 4 + 4 + 12 + 2 + 2 + 512);
    }

    #[test]
    fn extra_data_is_skipped() {
        let mut out = ByteWriter::new();
        out.put_slice(&PMF_MAGIC);
        out.put_u8(1);
        out.put_string("x");
        out.put_u32(7);
        out.put_u32(9);
        out.put_f32(1.0);
        out.put_f32(2.0);
        out.put_f32(3.0);
        out.put_u8(1);
        out.put_u8(8);
        out.put_u16(3);
        out.put_slice(&[0xAA, 0xBB, 0xCC]);
        out.put_u16(0b101);

        let header = LevelHeader::decode(&mut ByteCursor::new(out.freeze())).unwrap();
        assert_eq!(header.seed, 7);
        assert_eq!(header.time, 9);
        assert_eq!(header.presence.mask(0, 0), Some(0b101));
    }

    #[test]
    fn truncated_header_fails() {
        let bytes = encode(&sample()).freeze();
        for cut in [0, 4, 10, 30, bytes.len() - 1] {
            let mut cursor = ByteCursor::new(bytes.slice(..cut));
            assert!(
                matches!(LevelHeader::decode(&mut cursor), Err(PmfError::Truncated { .. })),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn bad_magic_still_decodes() {
        let mut bytes = encode(&sample()).freeze().to_vec();
        bytes[..3].copy_from_slice(b"XYZ");
        let header = LevelHeader::decode(&mut ByteCursor::new(bytes)).unwrap();
        assert_eq!(header.name, "Legacy World");
    }

    #[test]
    fn presence_is_row_major_by_z() {
        let mut masks = vec![0u16; 4];
        masks[2 + 1] = 0xFFFF; // z = 1, x = 1
        masks[1] = 0x0001; // z = 0, x = 1
        let table = PresenceTable::from_masks(2, masks).unwrap();
        assert_eq!(table.mask(1, 0), Some(0x0001));
        assert_eq!(table.mask(1, 1), Some(0xFFFF));
        assert_eq!(table.mask(0, 1), Some(0));
        assert_eq!(table.mask(2, 0), None);
        assert_eq!(table.mask(-1, 0), None);
    }

    #[test]
    fn presence_size_is_validated() {
        assert!(matches!(
            PresenceTable::from_masks(3, vec![0; 8]),
            Err(PmfError::InvalidPresenceTable { width: 3, len: 8 })
        ));
    }

    #[test]
    fn spawn_truncates_toward_zero() {
        assert_eq!(SpawnPoint::new(10.9, 64.2, -3.7).block_pos(), (10, 64, -3));
    }
}
