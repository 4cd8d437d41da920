//! Filter snapshots for transport between tiers
//!
//! A snapshot carries the complete filter state (bits, size, hash count)
//! under an explicit format version. Every field is mandatory: a payload
//! missing any of them fails to deserialize, and `validate()` checks that
//! the fields agree with each other before a filter accepts the import.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::parameters::MAX_HASH_COUNT;
use crate::error::FilterError;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete, transportable filter state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSnapshot {
    /// Snapshot format version
    pub version: u32,
    /// Bit array size (m)
    pub size: usize,
    /// Number of hash functions (k)
    pub hash_function_count: usize,
    /// Bit array contents, packed
    #[serde(with = "bitvec_serde")]
    pub bits: BitVec<u8, Lsb0>,
}

/// Serde support for BitVec: packed bytes plus the logical bit length
mod bitvec_serde {
    use bitvec::prelude::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bits: &BitVec<u8, Lsb0>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bytes: Vec<u8> = bits.as_raw_slice().to_vec();
        (bytes, bits.len()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BitVec<u8, Lsb0>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (bytes, len): (Vec<u8>, usize) = Deserialize::deserialize(deserializer)?;
        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes);
        // A length larger than the payload leaves `bits` short; validate() catches it
        bits.truncate(len);
        Ok(bits)
    }
}

impl FilterSnapshot {
    /// Check internal consistency
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(FilterError::UnsupportedSnapshotVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if self.size == 0 {
            return Err(FilterError::InvalidSnapshot(
                "size must be positive".to_string(),
            ));
        }
        if self.hash_function_count == 0 {
            return Err(FilterError::InvalidSnapshot(
                "hashFunctionCount must be positive".to_string(),
            ));
        }
        if self.hash_function_count > MAX_HASH_COUNT {
            return Err(FilterError::InvalidSnapshot(format!(
                "hashFunctionCount {} exceeds {}",
                self.hash_function_count, MAX_HASH_COUNT
            )));
        }
        if self.bits.len() != self.size {
            return Err(FilterError::InvalidSnapshot(format!(
                "bit array holds {} bits but size is {}",
                self.bits.len(),
                self.size
            )));
        }
        Ok(())
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<String, FilterError> {
        serde_json::to_string(self).map_err(|e| FilterError::Serialization(e.to_string()))
    }

    /// Decode from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| FilterError::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Encode with bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>, FilterError> {
        bincode::serialize(self).map_err(|e| FilterError::Serialization(e.to_string()))
    }

    /// Decode from bincode and validate
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| FilterError::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Summary reported alongside a hydration snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub total_usernames: usize,
    pub false_positive_rate: f64,
    pub size: usize,
    pub hash_function_count: usize,
}

/// What a hydration source hands to a client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationPayload {
    pub bloom_filter: FilterSnapshot,
    pub info: SnapshotInfo,
}
