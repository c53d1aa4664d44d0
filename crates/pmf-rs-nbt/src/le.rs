//! Little-endian NBT as stored on disk by Bedrock (level.dat, LevelDB values).
//!
//! Ints and array lengths are `i32_le`, string lengths are `u16_le`.

use bytes::{Buf, BufMut};

use crate::error::NbtError;
use crate::tag::{NbtCompound, NbtRoot, NbtTag};

const MAX_DEPTH: usize = 512;

const TAG_END: u8 = 0;
const TAG_COMPOUND: u8 = 10;

pub(crate) fn read_root(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    ensure(buf, 1)?;
    let tag_type = buf.get_u8();
    if tag_type != TAG_COMPOUND {
        return Err(NbtError::ExpectedCompound { got: tag_type });
    }
    let name = read_string(buf)?;
    let compound = read_compound(buf, 0)?;
    Ok(NbtRoot { name, compound })
}

pub(crate) fn write_root(buf: &mut impl BufMut, root: &NbtRoot) {
    buf.put_u8(TAG_COMPOUND);
    write_string(buf, &root.name);
    write_compound(buf, &root.compound);
}

fn read_value(buf: &mut impl Buf, tag_type: u8, depth: usize) -> Result<NbtTag, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }
    let tag = match tag_type {
        1 => {
            ensure(buf, 1)?;
            NbtTag::Byte(buf.get_i8())
        }
        2 => {
            ensure(buf, 2)?;
            NbtTag::Short(buf.get_i16_le())
        }
        3 => {
            ensure(buf, 4)?;
            NbtTag::Int(buf.get_i32_le())
        }
        4 => {
            ensure(buf, 8)?;
            NbtTag::Long(buf.get_i64_le())
        }
        5 => {
            ensure(buf, 4)?;
            NbtTag::Float(buf.get_f32_le())
        }
        6 => {
            ensure(buf, 8)?;
            NbtTag::Double(buf.get_f64_le())
        }
        7 => {
            let len = read_len(buf)?;
            ensure(buf, len)?;
            NbtTag::ByteArray((0..len).map(|_| buf.get_i8()).collect())
        }
        8 => NbtTag::String(read_string(buf)?),
        9 => {
            ensure(buf, 1)?;
            let element_type = buf.get_u8();
            let len = read_len(buf)?;
            let mut list = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                list.push(read_value(buf, element_type, depth + 1)?);
            }
            NbtTag::List(list)
        }
        10 => NbtTag::Compound(read_compound(buf, depth + 1)?),
        11 => {
            let len = read_len(buf)?;
            ensure(buf, len * 4)?;
            NbtTag::IntArray((0..len).map(|_| buf.get_i32_le()).collect())
        }
        12 => {
            let len = read_len(buf)?;
            ensure(buf, len * 8)?;
            NbtTag::LongArray((0..len).map(|_| buf.get_i64_le()).collect())
        }
        other => return Err(NbtError::UnknownTagType(other)),
    };
    Ok(tag)
}

fn read_compound(buf: &mut impl Buf, depth: usize) -> Result<NbtCompound, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }
    let mut map = NbtCompound::new();
    loop {
        ensure(buf, 1)?;
        let tag_type = buf.get_u8();
        if tag_type == TAG_END {
            return Ok(map);
        }
        let name = read_string(buf)?;
        let value = read_value(buf, tag_type, depth)?;
        map.insert(name, value);
    }
}

fn read_len(buf: &mut impl Buf) -> Result<usize, NbtError> {
    ensure(buf, 4)?;
    let len = buf.get_i32_le();
    if len < 0 {
        return Err(NbtError::NegativeLength(len));
    }
    Ok(len as usize)
}

fn read_string(buf: &mut impl Buf) -> Result<String, NbtError> {
    ensure(buf, 2)?;
    let len = buf.get_u16_le() as usize;
    ensure(buf, len)?;
    let data = buf.copy_to_bytes(len);
    String::from_utf8(data.to_vec()).map_err(|_| NbtError::InvalidUtf8)
}

fn ensure(buf: &impl Buf, needed: usize) -> Result<(), NbtError> {
    if buf.remaining() < needed {
        Err(NbtError::UnexpectedEof)
    } else {
        Ok(())
    }
}

fn write_value(buf: &mut impl BufMut, tag: &NbtTag) {
    match tag {
        NbtTag::Byte(v) => buf.put_i8(*v),
        NbtTag::Short(v) => buf.put_i16_le(*v),
        NbtTag::Int(v) => buf.put_i32_le(*v),
        NbtTag::Long(v) => buf.put_i64_le(*v),
        NbtTag::Float(v) => buf.put_f32_le(*v),
        NbtTag::Double(v) => buf.put_f64_le(*v),
        NbtTag::ByteArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            arr.iter().for_each(|&b| buf.put_i8(b));
        }
        NbtTag::String(s) => write_string(buf, s),
        NbtTag::List(list) => {
            // Empty lists carry TAG_End as their element type.
            let element_type = list.first().map_or(TAG_END, NbtTag::type_id);
            buf.put_u8(element_type);
            buf.put_i32_le(list.len() as i32);
            list.iter().for_each(|item| write_value(buf, item));
        }
        NbtTag::Compound(map) => write_compound(buf, map),
        NbtTag::IntArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            arr.iter().for_each(|&v| buf.put_i32_le(v));
        }
        NbtTag::LongArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            arr.iter().for_each(|&v| buf.put_i64_le(v));
        }
    }
}

fn write_compound(buf: &mut impl BufMut, map: &NbtCompound) {
    for (name, tag) in map {
        buf.put_u8(tag.type_id());
        write_string(buf, name);
        write_value(buf, tag);
    }
    buf.put_u8(TAG_END);
}

fn write_string(buf: &mut impl BufMut, s: &str) {
    buf.put_u16_le(s.len() as u16);
    buf.put_slice(s.as_bytes());
}
