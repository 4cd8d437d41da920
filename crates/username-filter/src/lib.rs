//! # Username Filter
//!
//! Probabilistic username-availability checking for signup flows.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `BloomFilter`: Core probabilistic data structure
//!   - `FilterSnapshot`: Versioned transport format for filter state
//!   - `validate_format` / `validate_real_time`: Username rules
//!   - `generate_suggestions`: Alternatives for taken names
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `UsernameAvailabilityApi`: Driving port (inbound API)
//!   - `UsernameLookup` / `UsernameRegistry`: Authoritative store
//!   - `SnapshotSource`: Filter hydration
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `AvailabilityService`: Implements `UsernameAvailabilityApi`
//!   - `RealTimeValidator`: Debounced checks for live input
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `InMemoryUsernameRegistry`, `RegistrySnapshotSource`, `FileSnapshotSource`
//!
//! ## Invariants
//!
//! - **No false negatives**: once added, `might_exist()` MUST return true
//! - **Case insensitivity**: keys are lower-cased before hashing
//! - **Update after commit**: the filter only learns a username once its
//!   registration is durable
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use username_filter::{
//!     AvailabilityConfig, AvailabilityService, InMemoryUsernameRegistry,
//!     RegistrySnapshotSource, UsernameAvailabilityApi,
//! };
//!
//! let registry = Arc::new(InMemoryUsernameRegistry::seeded());
//! let config = AvailabilityConfig::default();
//! let service = AvailabilityService::new(registry.clone(), config.clone())?;
//!
//! // Warm start from the authoritative store
//! let source = RegistrySnapshotSource::new(registry, config.filter);
//! service.hydrate(&source).await?;
//!
//! let result = service.check_availability("johndoe").await;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{FileSnapshotSource, InMemoryUsernameRegistry, RegistrySnapshotSource};
pub use domain::{
    AvailabilityConfig, AvailabilityConfigBuilder, BloomFilter, FilterConfig, FilterSnapshot,
    FormatViolation, HydrationPayload, SnapshotInfo,
};
pub use error::{DataError, FilterError};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::{
    AcceptedVia, AvailabilityResult, LookupResponse, SnapshotSource, UsernameAvailabilityApi,
    UsernameLookup, UsernameRegistry,
};
pub use service::{AvailabilityService, RealTimeOutcome, RealTimeValidator, SharedFilter};
