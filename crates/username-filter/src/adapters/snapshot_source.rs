//! Filter hydration sources
//!
//! - `RegistrySnapshotSource` builds a fresh filter from every username in
//!   the registry (server warm start, client hydration endpoint)
//! - `FileSnapshotSource` reads and writes a JSON snapshot on disk
//!   (restart without rebuilding, persist on shutdown)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{BloomFilter, FilterConfig, FilterSnapshot, HydrationPayload, SnapshotInfo};
use crate::error::DataError;
use crate::ports::{SnapshotSource, UsernameRegistry};

/// Builds snapshots from the authoritative registry
pub struct RegistrySnapshotSource<R: UsernameRegistry> {
    registry: Arc<R>,
    config: FilterConfig,
}

impl<R: UsernameRegistry> RegistrySnapshotSource<R> {
    pub fn new(registry: Arc<R>, config: FilterConfig) -> Self {
        Self { registry, config }
    }

    /// Snapshot plus a summary of what went into it
    pub async fn build_payload(&self) -> Result<HydrationPayload, DataError> {
        let usernames = self.registry.usernames().await?;

        let mut filter = BloomFilter::new(self.config.expected_elements, self.config.target_fpr)
            .map_err(|e| DataError::QueryError(e.to_string()))?;
        for username in &usernames {
            filter.add(username);
        }

        let info = SnapshotInfo {
            total_usernames: usernames.len(),
            false_positive_rate: filter.false_positive_probability(),
            size: filter.size_bits(),
            hash_function_count: filter.hash_count(),
        };
        debug!(
            total_usernames = info.total_usernames,
            false_positive_rate = info.false_positive_rate,
            "Built filter snapshot from registry"
        );

        Ok(HydrationPayload {
            bloom_filter: filter.export(),
            info,
        })
    }
}

#[async_trait]
impl<R: UsernameRegistry + 'static> SnapshotSource for RegistrySnapshotSource<R> {
    async fn fetch_snapshot(&self) -> Result<FilterSnapshot, DataError> {
        Ok(self.build_payload().await?.bloom_filter)
    }
}

/// JSON snapshot stored in a file
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Write `snapshot` as JSON, replacing any previous file
    pub async fn persist(&self, snapshot: &FilterSnapshot) -> Result<(), DataError> {
        let json = snapshot
            .to_json()
            .map_err(|e| DataError::QueryError(e.to_string()))?;

        // Write a sibling file, then rename it into place
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| DataError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DataError::Io(e.to_string()))?;

        info!(path = %self.path.display(), size_bits = snapshot.size, "Filter snapshot persisted");
        Ok(())
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<FilterSnapshot, DataError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    DataError::NotFound(self.path.display().to_string())
                }
                _ => DataError::Io(e.to_string()),
            })?;
        FilterSnapshot::from_json(&json).map_err(|e| DataError::QueryError(e.to_string()))
    }
}
