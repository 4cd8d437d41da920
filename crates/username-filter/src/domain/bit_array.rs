//! Fixed-size bit array backing the Bloom filter
//!
//! Indices are always produced by the hash engine and are therefore in
//! range; an out-of-range index is a programming error and panics.

use bitvec::prelude::*;

/// Fixed-length sequence of bit flags, all initially unset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitArray {
    bits: BitVec<u8, Lsb0>,
}

impl BitArray {
    /// Allocate `len` unset bits
    pub fn new(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; len],
        }
    }

    /// Wrap an existing bit vector (used when importing snapshots)
    pub fn from_bitvec(bits: BitVec<u8, Lsb0>) -> Self {
        Self { bits }
    }

    /// Set bit `index` (idempotent)
    pub fn set(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    /// Read bit `index`
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Reset every bit to unset
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Number of set bits
    pub fn count_set(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_bitvec(&self) -> &BitVec<u8, Lsb0> {
        &self.bits
    }
}
