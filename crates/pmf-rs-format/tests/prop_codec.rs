use pmf_rs_format::{BlockPos, ByteCursor, ByteWriter, ChunkColumn, LevelHeader, SpawnPoint, SubChunk};
use proptest::prelude::*;

fn local() -> impl Strategy<Value = usize> {
    0usize..16
}

fn world_pos() -> impl Strategy<Value = BlockPos> {
    (0i32..256, 0i32..128, 0i32..256).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

proptest! {
    // id writes land where reads look, and leave metadata alone
    #[test]
    fn id_roundtrip(x in local(), y in local(), z in local(), id in any::<u8>(), meta in 0u8..16) {
        let mut sc = SubChunk::empty();
        sc.set_meta(x, y, z, meta);
        sc.set_id(x, y, z, id);
        prop_assert_eq!(sc.id(x, y, z), id);
        prop_assert_eq!(sc.meta(x, y, z), meta);
    }

    // both nibbles of a byte are independent
    #[test]
    fn meta_parity_isolation(x in local(), pair in 0usize..8, z in local(), even in 0u8..16, odd in 0u8..16, again in 0u8..16) {
        let mut sc = SubChunk::empty();
        let (y0, y1) = (pair * 2, pair * 2 + 1);
        sc.set_meta(x, y0, z, even);
        sc.set_meta(x, y1, z, odd);
        prop_assert_eq!(sc.meta(x, y0, z), even);
        prop_assert_eq!(sc.meta(x, y1, z), odd);

        sc.set_meta(x, y0, z, again);
        prop_assert_eq!(sc.meta(x, y0, z), again);
        prop_assert_eq!(sc.meta(x, y1, z), odd);
    }

    // every in-world position round-trips through a column
    #[test]
    fn column_roundtrip(pos in world_pos(), id in any::<u8>(), meta in any::<u8>()) {
        let mut column = ChunkColumn::new();
        column.ensure_sub_chunk(pos.sub_chunk_y());
        column.set_block_id(pos, id).unwrap();
        column.write_meta(pos, meta).unwrap();
        prop_assert_eq!(column.block_id(pos), id);
        prop_assert_eq!(column.block_meta(pos), meta & 0x0F);
    }

    // anything outside the cube reads as air
    #[test]
    fn outside_world_is_air(x in -512i32..512, y in -256i32..512, z in -512i32..512) {
        let pos = BlockPos::new(x, y, z);
        prop_assume!(!pos.in_world());
        let mut column = ChunkColumn::new();
        for sy in 0..16 {
            let sc = column.ensure_sub_chunk(sy);
            for i in 0..16 {
                sc.set_id(i, i, i, 1);
            }
        }
        prop_assert_eq!(column.block_id(pos), 0);
        prop_assert_eq!(column.block_meta(pos), 0);
    }

    // header fields survive encode/decode
    #[test]
    fn header_roundtrip(
        name in "[a-zA-Z0-9 _-]{0,40}",
        version in any::<u8>(),
        seed in any::<u32>(),
        time in any::<u32>(),
        sx in -1.0e6f32..1.0e6,
        sy in 0.0f32..128.0,
        sz in -1.0e6f32..1.0e6,
        width in 0u8..=16,
        height in 1u8..=8,
    ) {
        let mut header = LevelHeader::new(name, width, height);
        header.version = version;
        header.seed = seed;
        header.time = time;
        header.spawn = SpawnPoint::new(sx, sy, sz);

        let mut out = ByteWriter::new();
        header.encode(&mut out);
        let mut cursor = ByteCursor::new(out.freeze());
        let decoded = LevelHeader::decode(&mut cursor).unwrap();
        prop_assert_eq!(decoded, header);
        prop_assert_eq!(cursor.remaining(), 0);
    }
}
