//! 16×16×16 sub-chunk storage and its index arithmetic.
//!
//! Each `(x, z)` pair owns a 32-byte stride at `(x << 5) + (z << 9)`:
//! bytes `[0, 16)` hold one block id per `y`, bytes `[16, 24)` hold the
//! metadata nibbles (low nibble for even `y`, high for odd `y`). The last
//! eight bytes of each stride are never addressed.

use crate::error::PmfError;

/// Size of one stored sub-chunk record.
pub const SUB_CHUNK_SIZE: usize = 8192;

/// Byte offset of the block id at local `(x, y, z)`.
#[inline]
pub const fn id_index(x: usize, y: usize, z: usize) -> usize {
    y + (x << 5) + (z << 9)
}

/// Byte offset of the metadata nibble pair holding local `(x, y, z)`.
///
/// `y` and `y ^ 1` share a byte; use the parity of `y` to pick the nibble.
#[inline]
pub const fn meta_index(x: usize, y: usize, z: usize) -> usize {
    (y >> 1) + 16 + (x << 5) + (z << 9)
}

#[derive(Clone, PartialEq, Eq)]
pub struct SubChunk {
    data: Box<[u8; SUB_CHUNK_SIZE]>,
}

impl SubChunk {
    /// An all-air sub-chunk.
    pub fn empty() -> Self {
        Self {
            data: Box::new([0; SUB_CHUNK_SIZE]),
        }
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, PmfError> {
        let data: Box<[u8; SUB_CHUNK_SIZE]> = data
            .to_vec()
            .into_boxed_slice()
            .try_into()
            .map_err(|rest: Box<[u8]>| PmfError::InvalidSubChunkLength(rest.len()))?;
        Ok(Self { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    /// Local coordinates must be in `[0, 16)`.
    #[inline]
    pub fn id(&self, x: usize, y: usize, z: usize) -> u8 {
        self.data[id_index(x, y, z)]
    }

    #[inline]
    pub fn set_id(&mut self, x: usize, y: usize, z: usize, id: u8) {
        self.data[id_index(x, y, z)] = id;
    }

    #[inline]
    pub fn meta(&self, x: usize, y: usize, z: usize) -> u8 {
        let byte = self.data[meta_index(x, y, z)];
        if y & 1 == 0 {
            byte & 0x0F
        } else {
            byte >> 4
        }
    }

    /// Merge a 4-bit value into the nibble for `(x, y, z)`, keeping its neighbour.
    #[inline]
    pub fn set_meta(&mut self, x: usize, y: usize, z: usize, value: u8) {
        let value = value & 0x0F;
        let slot = &mut self.data[meta_index(x, y, z)];
        *slot = if y & 1 == 0 {
            (*slot & 0xF0) | value
        } else {
            (*slot & 0x0F) | (value << 4)
        };
    }

    /// True when every block id is zero.
    pub fn is_air(&self) -> bool {
        (0..16).all(|z| (0..16).all(|x| (0..16).all(|y| self.id(x, y, z) == 0)))
    }
}

impl Default for SubChunk {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for SubChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_air = (0..16)
            .flat_map(|z| (0..16).flat_map(move |x| (0..16).map(move |y| (x, y, z))))
            .filter(|&(x, y, z)| self.id(x, y, z) != 0)
            .count();
        f.debug_struct("SubChunk").field("non_air", &non_air).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_index_is_injective() {
        let mut seen = HashSet::new();
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    assert!(seen.insert(id_index(x, y, z)));
                }
            }
        }
        assert!(seen.iter().all(|&i| i < SUB_CHUNK_SIZE));
    }

    #[test]
    fn meta_index_with_parity_is_injective() {
        let mut seen = HashSet::new();
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    assert!(seen.insert((meta_index(x, y, z), y & 1)));
                }
            }
        }
    }

    #[test]
    fn meta_never_overlaps_ids() {
        let ids: HashSet<_> = (0..16)
            .flat_map(|x| (0..16).flat_map(move |y| (0..16).map(move |z| id_index(x, y, z))))
            .collect();
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    let m = meta_index(x, y, z);
                    assert!(!ids.contains(&m));
                    assert!(m < SUB_CHUNK_SIZE);
                }
            }
        }
    }

    #[test]
    fn known_offsets() {
        assert_eq!(id_index(0, 0, 0), 0);
        assert_eq!(id_index(1, 2, 3), 2 + 32 + 1536);
        assert_eq!(meta_index(0, 0, 0), 16);
        assert_eq!(meta_index(0, 1, 0), 16);
        assert_eq!(meta_index(15, 15, 15), 7 + 16 + 480 + 7680);
    }

    #[test]
    fn nibbles_do_not_cross_talk() {
        let mut sc = SubChunk::empty();
        sc.set_meta(3, 4, 5, 0xA);
        sc.set_meta(3, 5, 5, 0x5);
        assert_eq!(sc.meta(3, 4, 5), 0xA);
        assert_eq!(sc.meta(3, 5, 5), 0x5);
        assert_eq!(sc.as_bytes()[meta_index(3, 4, 5)], 0x5A);

        sc.set_meta(3, 4, 5, 0x1);
        assert_eq!(sc.meta(3, 5, 5), 0x5);
    }

    #[test]
    fn meta_value_is_masked() {
        let mut sc = SubChunk::empty();
        sc.set_meta(0, 1, 0, 0xFF);
        assert_eq!(sc.meta(0, 1, 0), 0xF);
        assert_eq!(sc.meta(0, 0, 0), 0);
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(SubChunk::from_slice(&[0; SUB_CHUNK_SIZE]).is_ok());
        assert!(matches!(
            SubChunk::from_slice(&[0; 100]),
            Err(PmfError::InvalidSubChunkLength(100))
        ));
    }

    #[test]
    fn is_air_ignores_meta() {
        let mut sc = SubChunk::empty();
        sc.set_meta(1, 1, 1, 3);
        assert!(sc.is_air());
        sc.set_id(1, 1, 1, 4);
        assert!(!sc.is_air());
    }
}
