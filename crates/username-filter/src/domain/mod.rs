//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Hash engine and bit array
//! - Bloom filter and parameter calculations
//! - Snapshot value types
//! - Username format rules
//! - Suggestion generation
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bit_array;
pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod parameters;
pub mod snapshot;
pub mod suggestions;
pub mod username_rules;

pub use bit_array::BitArray;
pub use bloom_filter::BloomFilter;
pub use config::{AvailabilityConfig, AvailabilityConfigBuilder, FilterConfig};
pub use hash_functions::compute_hash_positions;
pub use parameters::{calculate_optimal_parameters, BloomFilterParams, MAX_HASH_COUNT};
pub use snapshot::{FilterSnapshot, HydrationPayload, SnapshotInfo, SNAPSHOT_VERSION};
pub use suggestions::{generate_suggestions, generate_suggestions_for_year, MAX_SUGGESTIONS};
pub use username_rules::{
    validate_format, validate_real_time, FormatViolation, RESERVED_USERNAMES,
};
