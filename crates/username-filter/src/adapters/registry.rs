//! In-memory username registry
//!
//! Stand-in for the authoritative user store. Names are compared
//! case-insensitively and stored lower case.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::generate_suggestions;
use crate::error::DataError;
use crate::ports::{LookupResponse, UsernameLookup, UsernameRegistry};

/// Usernames every fresh deployment starts with
pub const DEFAULT_ROSTER: &[&str] = &[
    "admin", "john_doe", "jane_smith", "gamer123", "developer", "test_user",
    "example_user", "demo_account", "sample_user", "game_dev", "unity_dev",
    "pixel_art", "code_master", "game_maker", "indie_dev", "pro_gamer",
];

/// Case-insensitive in-memory registry
#[derive(Default)]
pub struct InMemoryUsernameRegistry {
    usernames: RwLock<HashSet<String>>,
}

impl InMemoryUsernameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_usernames<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            usernames: RwLock::new(
                usernames
                    .into_iter()
                    .map(|name| name.as_ref().to_lowercase())
                    .collect(),
            ),
        }
    }

    /// Registry pre-populated with `DEFAULT_ROSTER`
    pub fn seeded() -> Self {
        Self::with_usernames(DEFAULT_ROSTER.iter().copied())
    }

    pub fn contains(&self, username: &str) -> bool {
        self.usernames.read().contains(&username.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.usernames.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.read().is_empty()
    }
}

#[async_trait]
impl UsernameLookup for InMemoryUsernameRegistry {
    async fn exists(&self, username: &str) -> Result<LookupResponse, DataError> {
        if username.is_empty() {
            return Err(DataError::QueryError("Username is required".to_string()));
        }

        if self.contains(username) {
            debug!(username = %username, "Registry: username taken");
            Ok(LookupResponse::taken(Some(generate_suggestions(username))))
        } else {
            Ok(LookupResponse::available())
        }
    }
}

#[async_trait]
impl UsernameRegistry for InMemoryUsernameRegistry {
    async fn register(&self, username: &str) -> Result<(), DataError> {
        if username.is_empty() {
            return Err(DataError::QueryError("Username is required".to_string()));
        }

        let mut usernames = self.usernames.write();
        if !usernames.insert(username.to_lowercase()) {
            return Err(DataError::AlreadyExists(username.to_string()));
        }
        Ok(())
    }

    async fn usernames(&self) -> Result<Vec<String>, DataError> {
        let mut names: Vec<String> = self.usernames.read().iter().cloned().collect();
        names.sort();
        Ok(names)
    }
}
