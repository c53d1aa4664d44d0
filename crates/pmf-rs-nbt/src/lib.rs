//! Little-endian NBT (Named Binary Tag) for Bedrock world storage.
//!
//! Only the on-disk variant is implemented: ints are `i32_le`, string lengths
//! are `u16_le`. Compounds are ordered maps so the same tree always encodes to
//! the same bytes.

pub mod error;
mod le;
pub mod tag;

pub use error::NbtError;
pub use tag::{NbtCompound, NbtRoot, NbtTag};

use bytes::{Buf, BufMut};

/// Read one little-endian NBT root compound from a buffer.
pub fn read_nbt_le(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    le::read_root(buf)
}

/// Write one little-endian NBT root compound to a buffer.
pub fn write_nbt_le(buf: &mut impl BufMut, root: &NbtRoot) {
    le::write_root(buf, root)
}

/// Encode a root compound into a fresh byte vector.
pub fn to_le_bytes(root: &NbtRoot) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    write_nbt_le(&mut out, root);
    out
}
