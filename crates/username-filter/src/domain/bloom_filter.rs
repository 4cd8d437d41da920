//! Core Bloom filter for username membership
//!
//! INVARIANTS:
//! - m and k are fixed at construction (or replaced wholesale by `import`)
//! - Bits only move from unset to set, except through `clear`
//! - No false negatives: once added, `might_exist` MUST return true
//!
//! There is deliberately no `remove`: unsetting a bit shared with another
//! key would introduce false negatives.

use super::bit_array::BitArray;
use super::hash_functions::compute_hash_positions;
use super::parameters::{calculate_optimal_parameters, estimate_fpr_from_fill, MAX_HASH_COUNT};
use super::snapshot::{FilterSnapshot, SNAPSHOT_VERSION};
use crate::error::FilterError;

/// Bloom filter over case-insensitive username keys
///
/// A space-efficient probabilistic set: `might_exist` can report a key that
/// was never added (false positive), but never misses a key that was.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitArray,
    /// Size in bits (m)
    m: usize,
    /// Number of hash functions (k)
    k: usize,
}

impl BloomFilter {
    /// Create a filter sized for `expected_elements` at `false_positive_rate`
    ///
    /// Fails if `expected_elements` is zero or the rate is outside (0, 1).
    pub fn new(expected_elements: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        let params = calculate_optimal_parameters(expected_elements, false_positive_rate)?;
        Self::with_params(params.size_bits, params.hash_count)
    }

    /// Create a filter with explicit m and k
    pub fn with_params(m: usize, k: usize) -> Result<Self, FilterError> {
        if m == 0 || k == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "size and hash count must be positive (m={}, k={})",
                m, k
            )));
        }
        if k > MAX_HASH_COUNT {
            return Err(FilterError::InvalidParameters(format!(
                "hash count {} exceeds {}",
                k, MAX_HASH_COUNT
            )));
        }
        Ok(Self {
            bits: BitArray::new(m),
            m,
            k,
        })
    }

    fn positions(&self, key: &str) -> Vec<usize> {
        compute_hash_positions(&key.to_lowercase(), self.k, self.m)
    }

    /// Add a key; the empty string is a valid key
    pub fn add(&mut self, key: &str) {
        for pos in self.positions(key) {
            self.bits.set(pos);
        }
    }

    /// Test if a key might have been added
    ///
    /// Returns:
    /// - `false` if the key was definitely never added
    /// - `true` if it might have been (possibly a false positive)
    pub fn might_exist(&self, key: &str) -> bool {
        self.positions(key).iter().all(|&pos| self.bits.get(pos))
    }

    /// Current false positive estimate: (fraction of bits set)^k
    ///
    /// Rises as keys are added; only `clear` brings it back down.
    pub fn false_positive_probability(&self) -> f64 {
        estimate_fpr_from_fill(self.bits.count_set(), self.m, self.k)
    }

    /// Snapshot the full state for transport or persistence
    pub fn export(&self) -> FilterSnapshot {
        FilterSnapshot {
            version: SNAPSHOT_VERSION,
            size: self.m,
            hash_function_count: self.k,
            bits: self.bits.as_bitvec().clone(),
        }
    }

    /// Replace the whole state from a snapshot
    ///
    /// The snapshot is validated first; on error the filter is left untouched.
    pub fn import(&mut self, snapshot: FilterSnapshot) -> Result<(), FilterError> {
        snapshot.validate()?;
        self.m = snapshot.size;
        self.k = snapshot.hash_function_count;
        self.bits = BitArray::from_bitvec(snapshot.bits);
        Ok(())
    }

    /// Build a fresh filter from a snapshot
    pub fn from_snapshot(snapshot: FilterSnapshot) -> Result<Self, FilterError> {
        snapshot.validate()?;
        Ok(Self {
            m: snapshot.size,
            k: snapshot.hash_function_count,
            bits: BitArray::from_bitvec(snapshot.bits),
        })
    }

    /// Reset all bits; m and k are unchanged
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_set()
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Fraction of bits currently set
    pub fn fill_ratio(&self) -> f64 {
        self.bits.count_set() as f64 / self.m as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_optimal_sizing() {
        let filter = BloomFilter::new(50_000, 0.01).unwrap();
        assert_eq!(filter.size_bits(), 479_253);
        assert_eq!(filter.hash_count(), 7);
        assert_eq!(filter.bits_set(), 0, "All bits should be zero initially");
    }

    #[test]
    fn test_new_rejects_invalid_arguments() {
        assert!(matches!(
            BloomFilter::new(0, 0.01),
            Err(FilterError::InvalidExpectedElements(0))
        ));
        assert!(matches!(
            BloomFilter::new(100, 1.0),
            Err(FilterError::InvalidFalsePositiveRate { .. })
        ));
        assert!(BloomFilter::with_params(0, 3).is_err());
        assert!(BloomFilter::with_params(100, 0).is_err());
        assert!(BloomFilter::with_params(100, MAX_HASH_COUNT + 1).is_err());
    }

    #[test]
    fn test_add_sets_at_most_k_bits() {
        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        filter.add("jane_smith");
        assert!(filter.bits_set() > 0);
        assert!(filter.bits_set() <= filter.hash_count());
    }

    #[test]
    fn test_might_exist_after_add() {
        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        filter.add("gamer123");
        assert!(
            filter.might_exist("gamer123"),
            "might_exist() must return true for an added key"
        );
    }

    #[test]
    fn test_empty_filter_reports_nothing() {
        let filter = BloomFilter::new(1000, 0.01).unwrap();
        assert!(!filter.might_exist("anyone"));
        assert!(!filter.might_exist(""));
    }

    #[test]
    fn test_empty_string_is_a_valid_key() {
        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        filter.add("");
        assert!(filter.might_exist(""));
    }

    #[test]
    fn test_case_insensitive_membership() {
        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        filter.add("JohnDoe");
        assert!(filter.might_exist("johndoe"));
        assert!(filter.might_exist("JOHNDOE"));

        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        filter.add("johndoe");
        assert!(filter.might_exist("JohnDoe"));
    }

    #[test]
    fn test_no_false_negatives_bulk() {
        let mut filter = BloomFilter::new(5000, 0.01).unwrap();
        let names: Vec<String> = (0..5000).map(|i| format!("player_{:05}", i)).collect();

        for name in &names {
            filter.add(name);
        }
        for name in &names {
            assert!(filter.might_exist(name), "False negative for {}", name);
        }
    }

    #[test]
    fn test_false_positive_probability_tracks_fill() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        assert_eq!(filter.false_positive_probability(), 0.0);

        let mut previous = 0.0;
        for i in 0..100 {
            filter.add(&format!("creator{}", i));
            let current = filter.false_positive_probability();
            assert!(current >= previous, "Estimate must never decrease");
            previous = current;
        }

        let expected = filter.fill_ratio().powi(filter.hash_count() as i32);
        assert!((previous - expected).abs() < 1e-12);
    }

    #[test]
    fn test_clear_resets_membership() {
        let mut filter = BloomFilter::new(1000, 0.01).unwrap();
        let (m, k) = (filter.size_bits(), filter.hash_count());
        filter.add("pixel_art");
        filter.add("code_master");

        filter.clear();

        assert_eq!(filter.bits_set(), 0);
        assert!(!filter.might_exist("pixel_art"));
        assert!(!filter.might_exist("code_master"));
        assert_eq!((filter.size_bits(), filter.hash_count()), (m, k));
        assert_eq!(filter.false_positive_probability(), 0.0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut original = BloomFilter::new(500, 0.01).unwrap();
        for name in ["game_maker", "indie_dev", "pro_gamer"] {
            original.add(name);
        }

        let mut restored = BloomFilter::new(10, 0.2).unwrap();
        restored.import(original.export()).unwrap();

        assert_eq!(restored.size_bits(), original.size_bits());
        assert_eq!(restored.hash_count(), original.hash_count());
        assert_eq!(restored.bits_set(), original.bits_set());
        for i in 0..2000 {
            let probe = format!("probe{}", i);
            assert_eq!(restored.might_exist(&probe), original.might_exist(&probe));
        }
        assert!(restored.might_exist("indie_dev"));
    }

    #[test]
    fn test_rejected_import_keeps_previous_state() {
        let mut filter = BloomFilter::new(500, 0.01).unwrap();
        filter.add("unity_dev");
        let before = filter.export();

        let mut bad = before.clone();
        bad.size += 1;
        assert!(filter.import(bad).is_err());

        assert_eq!(filter.export(), before);
        assert!(filter.might_exist("unity_dev"));
    }

    #[test]
    fn test_import_rejects_oversized_hash_count() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        filter.add("pixel_art");
        let mut snapshot = filter.export();
        snapshot.hash_function_count = (1usize << 32) + 1;

        assert!(filter.import(snapshot.clone()).is_err());
        assert!(BloomFilter::from_snapshot(snapshot).is_err());
        assert_eq!(filter.hash_count(), 7);
        assert!(filter.might_exist("pixel_art"));
    }

    #[test]
    fn test_from_snapshot_matches_source() {
        let mut source = BloomFilter::new(200, 0.05).unwrap();
        source.add("demo_account");
        let copy = BloomFilter::from_snapshot(source.export()).unwrap();
        assert!(copy.might_exist("demo_account"));
        assert_eq!(copy.export(), source.export());
    }
}
