//! On-disk encodings for chunk records: v9 sub-chunks and Data3D.

use bytes::{Buf, BufMut};
use pmf_rs_nbt::{read_nbt_le, write_nbt_le};

use crate::chunk::{ChunkColumn, SubChunk, SUB_CHUNK_COUNT};
use crate::error::WriteError;
use crate::palette::{nbt_to_state, state_to_nbt};

/// Sub-chunk format version written to disk.
pub const SUB_CHUNK_VERSION: u8 = 9;

/// Palette header meaning "same storage as the previous sub-chunk".
const COPY_LAST: u8 = 0xFF;

const VALID_BITS: [u8; 8] = [1, 2, 3, 4, 5, 6, 8, 16];

/// Smallest valid bits-per-entry for a palette.
pub fn bits_per_block(palette_size: usize) -> u8 {
    for bits in VALID_BITS {
        if palette_size <= 1 << bits {
            return bits;
        }
    }
    16
}

/// Pack 4096 palette indices into LSB-first `u32` words.
fn write_packed(buf: &mut impl BufMut, bpb: u8, index_of: impl Fn(usize) -> u32) {
    let blocks_per_word = 32 / bpb as usize;
    let word_count = 4096_usize.div_ceil(blocks_per_word);
    let mask = (1u32 << bpb) - 1;
    for word_idx in 0..word_count {
        let mut word = 0u32;
        for slot in 0..blocks_per_word {
            let block_idx = word_idx * blocks_per_word + slot;
            if block_idx < 4096 {
                word |= (index_of(block_idx) & mask) << (bpb as u32 * slot as u32);
            }
        }
        buf.put_u32_le(word);
    }
}

fn read_packed(buf: &mut impl Buf, bpb: u8) -> Result<Vec<u16>, WriteError> {
    let blocks_per_word = 32 / bpb as usize;
    let word_count = 4096_usize.div_ceil(blocks_per_word);
    ensure(&*buf, word_count * 4)?;
    let mask = (1u32 << bpb) - 1;
    let mut blocks = Vec::with_capacity(4096);
    for _ in 0..word_count {
        let word = buf.get_u32_le();
        for slot in 0..blocks_per_word {
            if blocks.len() == 4096 {
                break;
            }
            blocks.push(((word >> (bpb as u32 * slot as u32)) & mask) as u16);
        }
    }
    Ok(blocks)
}

// ─── Sub-chunks ─────────────────────────────────────────────────────────────

/// `[version=9][num_layers=1][y_index][bpb<<1][words...][palette_len:i32_le][NBT_LE...]`
pub fn encode_sub_chunk(sub: &SubChunk, y_index: i8) -> Vec<u8> {
    let palette = sub.palette();
    let bpb = bits_per_block(palette.len());
    let mut buf = Vec::with_capacity(4 + 4096 * bpb as usize / 8 + 64 * palette.len());
    buf.put_u8(SUB_CHUNK_VERSION);
    buf.put_u8(1);
    buf.put_i8(y_index);
    buf.put_u8(bpb << 1);

    // Storage is already x-z-y, the order Bedrock expects.
    write_packed(&mut buf, bpb, |i| sub.palette_index(i) as u32);

    buf.put_i32_le(palette.len() as i32);
    for state in palette {
        write_nbt_le(&mut buf, &state_to_nbt(state));
    }
    buf
}

/// Decode the first storage layer of a v8 or v9 sub-chunk.
pub fn decode_sub_chunk(data: &[u8]) -> Result<(Option<i8>, SubChunk), WriteError> {
    let mut buf = data;
    ensure(&buf, 2)?;
    let version = buf.get_u8();
    if version != 8 && version != SUB_CHUNK_VERSION {
        return Err(WriteError::InvalidData(format!(
            "unsupported sub-chunk version {version}"
        )));
    }
    let num_layers = buf.get_u8();
    if num_layers == 0 {
        return Err(WriteError::InvalidData("sub-chunk has no layers".into()));
    }
    let y_index = if version == SUB_CHUNK_VERSION {
        ensure(&buf, 1)?;
        Some(buf.get_i8())
    } else {
        None
    };

    ensure(&buf, 1)?;
    let bpb = buf.get_u8() >> 1;
    if bpb != 0 && !VALID_BITS.contains(&bpb) {
        return Err(WriteError::InvalidData(format!("bits per block {bpb}")));
    }
    let blocks = if bpb == 0 {
        Vec::new()
    } else {
        read_packed(&mut buf, bpb)?
    };

    ensure(&buf, 4)?;
    let count = buf.get_i32_le();
    if count <= 0 {
        return Err(WriteError::InvalidData(format!("palette size {count}")));
    }
    let mut palette = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let root = read_nbt_le(&mut buf).map_err(|e| WriteError::InvalidData(e.to_string()))?;
        let state = nbt_to_state(&root)
            .ok_or_else(|| WriteError::InvalidData("malformed palette entry".into()))?;
        palette.push(state);
    }

    if blocks.iter().any(|&i| i as usize >= palette.len()) {
        return Err(WriteError::InvalidData("palette index out of range".into()));
    }
    Ok((y_index, SubChunk::from_parts(palette, blocks)))
}

// ─── Data3D ─────────────────────────────────────────────────────────────────

/// Heightmap (256 × `i16_le`) followed by one biome storage per sub-chunk.
///
/// The first storage holds the column's 2D biome map extruded over 16 blocks;
/// the other 23 repeat it.
pub fn encode_data_3d(column: &ChunkColumn) -> Vec<u8> {
    let mut buf = Vec::with_capacity(512 + 8 + SUB_CHUNK_COUNT);
    for h in column.heightmap() {
        buf.put_i16_le(h);
    }

    let biomes = column.biomes();
    let mut palette: Vec<u32> = Vec::new();
    for &b in biomes {
        if !palette.contains(&b) {
            palette.push(b);
        }
    }

    if palette.len() == 1 {
        buf.put_u8(0);
        buf.put_u32_le(palette[0]);
    } else {
        let bpb = bits_per_block(palette.len());
        buf.put_u8(bpb << 1);
        write_packed(&mut buf, bpb, |i| {
            // i = x*256 + z*16 + y; the biome map is indexed by x*16 + z.
            let biome = biomes[i >> 4];
            palette.iter().position(|&p| p == biome).unwrap_or(0) as u32
        });
        buf.put_i32_le(palette.len() as i32);
        for &b in &palette {
            buf.put_u32_le(b);
        }
    }

    for _ in 1..SUB_CHUNK_COUNT {
        buf.put_u8(COPY_LAST);
    }
    buf
}

fn ensure(buf: &impl Buf, needed: usize) -> Result<(), WriteError> {
    if buf.remaining() < needed {
        return Err(WriteError::InvalidData(format!(
            "need {needed} more bytes, have {}",
            buf.remaining()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::PLAINS_BIOME;
    use pmf_rs_blockstate::{CanonicalBlockState, StateValue};

    fn stone() -> CanonicalBlockState {
        CanonicalBlockState::new("minecraft:stone")
    }

    #[test]
    fn bits_per_block_valid_values() {
        assert_eq!(bits_per_block(1), 1);
        assert_eq!(bits_per_block(2), 1);
        assert_eq!(bits_per_block(3), 2);
        assert_eq!(bits_per_block(16), 4);
        assert_eq!(bits_per_block(17), 5);
        assert_eq!(bits_per_block(65), 8);
        assert_eq!(bits_per_block(257), 16);
    }

    #[test]
    fn header_bytes() {
        let mut sub = SubChunk::new_single(CanonicalBlockState::air());
        sub.set_block(0, 0, 0, &stone());
        let data = encode_sub_chunk(&sub, -4);
        assert_eq!(data[0], 9);
        assert_eq!(data[1], 1);
        assert_eq!(data[2] as i8, -4);
        assert_eq!(data[3], 1 << 1);
        // 128 words of 32 one-bit entries
        let count_at = 4 + 128 * 4;
        assert_eq!(
            i32::from_le_bytes(data[count_at..count_at + 4].try_into().unwrap()),
            2
        );
    }

    #[test]
    fn single_state_still_uses_one_bit() {
        let sub = SubChunk::new_single(CanonicalBlockState::air());
        let data = encode_sub_chunk(&sub, 0);
        assert_eq!(data[3], 2);
        assert!(data[4..4 + 512].iter().all(|&b| b == 0));
    }

    #[test]
    fn roundtrip_mixed() {
        let mut sub = SubChunk::new_single(CanonicalBlockState::air());
        let wheat = CanonicalBlockState::new("minecraft:wheat").with("growth", StateValue::Int(7));
        sub.set_block(0, 0, 0, &stone());
        sub.set_block(15, 15, 15, &wheat);
        sub.set_block(3, 9, 12, &stone());
        for i in 0..16 {
            sub.set_block(i, 2, 15 - i, &CanonicalBlockState::new(format!("minecraft:b{i}")));
        }

        let (y, decoded) = decode_sub_chunk(&encode_sub_chunk(&sub, 3)).unwrap();
        assert_eq!(y, Some(3));
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    assert_eq!(decoded.get_block(x, y, z), sub.get_block(x, y, z));
                }
            }
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_sub_chunk(&[]).is_err());
        assert!(decode_sub_chunk(&[1, 1, 0]).is_err());
        assert!(decode_sub_chunk(&[9, 1, 0, 2, 0]).is_err());
    }

    #[test]
    fn decode_rejects_unsupported_bits_per_block() {
        for header in [0x42u8, 0xFE, 7 << 1, 12 << 1] {
            assert!(matches!(
                decode_sub_chunk(&[9, 1, 0, header, 0, 0, 0, 0]),
                Err(WriteError::InvalidData(_))
            ));
        }
    }

    #[test]
    fn data_3d_single_biome() {
        let column = ChunkColumn::new(&CanonicalBlockState::air(), PLAINS_BIOME);
        let data = encode_data_3d(&column);
        assert_eq!(data.len(), 512 + 1 + 4 + 23);
        assert_eq!(data[512], 0);
        assert_eq!(u32::from_le_bytes(data[513..517].try_into().unwrap()), 1);
        assert!(data[517..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn data_3d_heightmap() {
        let mut column = ChunkColumn::new(&CanonicalBlockState::air(), PLAINS_BIOME);
        column.set_block(0, 63, 1, &stone());
        let data = encode_data_3d(&column);
        assert_eq!(i16::from_le_bytes([data[2], data[3]]), 128);
        assert_eq!(i16::from_le_bytes([data[0], data[1]]), 0);
    }

    #[test]
    fn data_3d_mixed_biomes() {
        let mut column = ChunkColumn::new(&CanonicalBlockState::air(), PLAINS_BIOME);
        column.set_biome(4, 4, 2);
        let data = encode_data_3d(&column);
        assert_eq!(data[512], 1 << 1);
        let count_at = 512 + 1 + 128 * 4;
        assert_eq!(
            i32::from_le_bytes(data[count_at..count_at + 4].try_into().unwrap()),
            2
        );
        assert_eq!(data.len(), count_at + 4 + 8 + 23);
    }
}
