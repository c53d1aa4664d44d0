//! Forward-only big-endian reader and writer for PMF records.
//!
//! Strings are a `u16` byte length followed by raw bytes. Every read checks the
//! remaining length first so a short buffer surfaces as [`PmfError::Truncated`].

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::PmfError;

/// Sequential reader over an owned byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    buf: Bytes,
}

impl ByteCursor {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Advance by exactly `n` bytes and return them.
    pub fn next(&mut self, n: usize) -> Result<Bytes, PmfError> {
        self.ensure_remaining(n)?;
        Ok(self.buf.split_to(n))
    }

    pub fn skip(&mut self, n: usize) -> Result<(), PmfError> {
        self.ensure_remaining(n)?;
        self.buf.advance(n);
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, PmfError> {
        self.ensure_remaining(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16, PmfError> {
        self.ensure_remaining(2)?;
        Ok(self.buf.get_u16())
    }

    pub fn read_u32(&mut self) -> Result<u32, PmfError> {
        self.ensure_remaining(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_f32(&mut self) -> Result<f32, PmfError> {
        self.ensure_remaining(4)?;
        Ok(self.buf.get_f32())
    }

    /// Read a `u16`-prefixed string. Invalid UTF-8 is replaced, not rejected.
    pub fn read_string(&mut self) -> Result<String, PmfError> {
        let len = self.read_u16()? as usize;
        let data = self.next(len)?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    fn ensure_remaining(&self, needed: usize) -> Result<(), PmfError> {
        if self.buf.remaining() < needed {
            return Err(PmfError::Truncated {
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }
}

/// Sequential writer mirroring [`ByteCursor`].
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_slice(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.put_u16(v);
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    pub fn put_f32(&mut self, v: f32) {
        self.buf.put_f32(v);
    }

    /// Write a `u16`-prefixed string, truncated to 65535 bytes.
    pub fn put_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let len = bytes.len().min(u16::MAX as usize);
        self.buf.put_u16(len as u16);
        self.buf.put_slice(&bytes[..len]);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}
