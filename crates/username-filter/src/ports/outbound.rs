//! Outbound Ports (Driven Ports)
//!
//! Dependencies the availability checker needs from the outside world:
//! the authoritative username store and a source of filter snapshots.

use async_trait::async_trait;

use crate::domain::FilterSnapshot;
use crate::error::DataError;

/// Answer from the authoritative lookup
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupResponse {
    /// Whether the username is actually taken
    pub exists: bool,
    /// Alternatives offered by the lookup service, if any
    pub suggestions: Option<Vec<String>>,
}

impl LookupResponse {
    pub fn available() -> Self {
        Self::default()
    }

    pub fn taken(suggestions: Option<Vec<String>>) -> Self {
        Self {
            exists: true,
            suggestions,
        }
    }
}

/// Authoritative "is this username taken" check (Driven Port)
///
/// May fail transiently; callers decide whether to retry.
#[async_trait]
pub trait UsernameLookup: Send + Sync {
    async fn exists(&self, username: &str) -> Result<LookupResponse, DataError>;
}

/// Authoritative store that can also commit new usernames
#[async_trait]
pub trait UsernameRegistry: UsernameLookup {
    /// Durably commit a username; fails with `AlreadyExists` if taken
    async fn register(&self, username: &str) -> Result<(), DataError>;

    /// Every committed username
    async fn usernames(&self) -> Result<Vec<String>, DataError>;
}

/// Filter hydration source (Driven Port)
///
/// Read at startup so the filter does not start cold.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<FilterSnapshot, DataError>;
}
