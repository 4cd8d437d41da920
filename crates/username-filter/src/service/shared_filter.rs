//! Process-wide filter handle
//!
//! `add` touches k bits non-atomically, so writers take the exclusive lock
//! and probes/exports take the shared lock. Concurrent probes never block
//! each other.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{BloomFilter, FilterSnapshot};
use crate::error::FilterError;

/// Cloneable, lock-guarded handle to one Bloom filter
#[derive(Clone, Debug)]
pub struct SharedFilter {
    inner: Arc<RwLock<BloomFilter>>,
}

impl SharedFilter {
    pub fn new(filter: BloomFilter) -> Self {
        Self {
            inner: Arc::new(RwLock::new(filter)),
        }
    }

    pub fn might_exist(&self, key: &str) -> bool {
        self.inner.read().might_exist(key)
    }

    pub fn add(&self, key: &str) {
        self.inner.write().add(key);
    }

    pub fn export(&self) -> FilterSnapshot {
        self.inner.read().export()
    }

    /// Validated in-place replacement; the handle itself stays the same
    pub fn import(&self, snapshot: FilterSnapshot) -> Result<(), FilterError> {
        self.inner.write().import(snapshot)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn false_positive_probability(&self) -> f64 {
        self.inner.read().false_positive_probability()
    }

    /// (m, k, bits set)
    pub fn stats(&self) -> (usize, usize, usize) {
        let filter = self.inner.read();
        (filter.size_bits(), filter.hash_count(), filter.bits_set())
    }
}
