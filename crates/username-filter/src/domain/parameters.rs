//! Optimal Bloom filter parameter calculation
//!
//! Formulas:
//! - m = ceil(-n*ln(p) / (ln(2)^2))  -- optimal bits
//! - k = ceil((m/n) * ln(2))         -- optimal hash functions

use std::f64::consts::LN_2;

use crate::error::FilterError;

/// Upper bound on k; covers every rate down to about 1e-19
pub const MAX_HASH_COUNT: usize = 64;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter (m)
    pub size_bits: usize,
    /// Number of hash functions (k)
    pub hash_count: usize,
    /// Theoretical false positive rate once n elements are inserted
    pub expected_fpr: f64,
}

/// Calculate optimal parameters for `num_elements` at `target_fpr`
///
/// Rejects a non-positive element count and any rate outside (0, 1).
pub fn calculate_optimal_parameters(
    num_elements: usize,
    target_fpr: f64,
) -> Result<BloomFilterParams, FilterError> {
    if num_elements == 0 {
        return Err(FilterError::InvalidExpectedElements(num_elements));
    }
    // Also rejects NaN
    if !(target_fpr > 0.0 && target_fpr < 1.0) {
        return Err(FilterError::InvalidFalsePositiveRate { fpr: target_fpr });
    }

    let n = num_elements as f64;
    let m = (-n * target_fpr.ln() / (LN_2 * LN_2)).ceil().max(1.0);
    let k = ((m / n) * LN_2).ceil().max(1.0);

    let size_bits = m as usize;
    let hash_count = k as usize;
    if hash_count > MAX_HASH_COUNT {
        return Err(FilterError::InvalidParameters(format!(
            "rate {} needs {} hash functions (max {})",
            target_fpr, hash_count, MAX_HASH_COUNT
        )));
    }

    Ok(BloomFilterParams {
        size_bits,
        hash_count,
        expected_fpr: calculate_fpr(size_bits, num_elements, hash_count),
    })
}

/// Theoretical false positive rate: (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powf(k as f64)
}

/// False positive estimate from the current fill: (bits_set / m)^k
pub fn estimate_fpr_from_fill(bits_set: usize, m: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    (bits_set as f64 / m as f64).powf(k as f64)
}
