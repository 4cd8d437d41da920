//! Adapters Layer (Driven Adapters)
//!
//! Implementations of driven ports.
//!
//! ## Adapters
//!
//! - `InMemoryUsernameRegistry` - Authoritative username store
//! - `RegistrySnapshotSource` - Builds filter snapshots from the registry
//! - `FileSnapshotSource` - Loads and persists snapshots as JSON files

pub mod registry;
pub mod snapshot_source;

pub use registry::{InMemoryUsernameRegistry, DEFAULT_ROSTER};
pub use snapshot_source::{FileSnapshotSource, RegistrySnapshotSource};
