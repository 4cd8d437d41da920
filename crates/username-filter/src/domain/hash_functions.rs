//! Hash functions for the username Bloom filter
//!
//! Three independent base hashes (multiplicative rolling, FNV-1a, djb2) are
//! reduced mod m. Positions beyond the third are synthesized with
//! quadratic double hashing: h(i) = h0 + i*h1 + i^2*h2 (mod m).
//!
//! Keys are hashed over their UTF-16 code units. There is no seed: the same
//! key always maps to the same positions.

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const DJB2_INIT: u32 = 5381;

/// Number of base hashes computed before double hashing kicks in
pub const BASE_HASH_COUNT: usize = 3;

/// Multiplicative rolling hash (h = h*31 + c)
pub fn rolling_hash(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as u32))
}

/// FNV-1a hash
pub fn fnv1a_hash(key: &str) -> u32 {
    key.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ unit as u32).wrapping_mul(FNV_PRIME)
    })
}

/// djb2 hash (h = h*33 + c)
pub fn djb2_hash(key: &str) -> u32 {
    key.encode_utf16().fold(DJB2_INIT, |hash, unit| {
        (hash << 5).wrapping_add(hash).wrapping_add(unit as u32)
    })
}

/// Compute exactly k positions in [0, m) for a key
///
/// The caller is responsible for normalizing the key (lower case).
/// Positions are not necessarily distinct.
///
/// # Panics
/// Panics if `m` is zero.
pub fn compute_hash_positions(key: &str, k: usize, m: usize) -> Vec<usize> {
    assert!(m > 0, "bit array size must be positive");
    let modulus = m as u64;

    let bases = [
        rolling_hash(key) as u64 % modulus,
        fnv1a_hash(key) as u64 % modulus,
        djb2_hash(key) as u64 % modulus,
    ];

    let mut positions: Vec<usize> = bases.iter().take(k).map(|&h| h as usize).collect();

    for i in BASE_HASH_COUNT..k {
        let i = i as u64;
        let combined = bases[0]
            .wrapping_add(i.wrapping_mul(bases[1]))
            .wrapping_add(i.wrapping_mul(i).wrapping_mul(bases[2]));
        positions.push((combined % modulus) as usize);
    }

    positions
}
