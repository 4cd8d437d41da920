//! Inbound Ports (Driving Ports)
//!
//! The API that a signup form or registration endpoint uses.

use async_trait::async_trait;

use crate::domain::{FilterSnapshot, FormatViolation};
use crate::error::FilterError;

/// How an available username was accepted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcceptedVia {
    /// The filter reported the name definitely absent; no lookup was made
    FilterMiss,
    /// The filter hit was a false positive, confirmed by the lookup service
    LookupConfirmed,
}

/// Outcome of a single availability check
///
/// Exactly one variant applies; suggestions only accompany `Unavailable`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvailabilityResult {
    /// The username can be used
    Available(AcceptedVia),
    /// The username breaks a format rule; no probe was made
    InvalidFormat(FormatViolation),
    /// The username is taken
    Unavailable { suggestions: Vec<String> },
    /// The authoritative check failed or timed out; the caller may retry
    CheckFailed(String),
}

impl AvailabilityResult {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Unavailable { suggestions } => suggestions,
            _ => &[],
        }
    }
}

/// Primary username availability API (Driving Port)
#[async_trait]
pub trait UsernameAvailabilityApi: Send + Sync {
    /// Format check, then filter probe, then (if needed) authoritative lookup
    async fn check_availability(&self, username: &str) -> AvailabilityResult;

    /// Cheap per-keystroke format check; an empty field is valid
    fn validate_real_time(&self, username: &str) -> Result<(), FormatViolation>;

    /// Call exactly once after a registration is durably committed
    fn record_registered_username(&self, username: &str);

    fn export_filter_state(&self) -> FilterSnapshot;

    /// Replace the filter state; on error the previous state is kept
    fn import_filter_state(&self, snapshot: FilterSnapshot) -> Result<(), FilterError>;
}
