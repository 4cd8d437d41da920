//! Keystroke-driven availability checks
//!
//! Every call to `check` starts a new generation. A check waits out the
//! debounce period, runs, and only delivers its result if no newer check
//! has started in the meantime; otherwise it reports `Superseded`. A slow
//! response for old input therefore never replaces the answer for the
//! current input.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::domain::FormatViolation;
use crate::ports::{AvailabilityResult, UsernameAvailabilityApi, UsernameLookup};

use super::availability_service::AvailabilityService;

/// Result of a debounced check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RealTimeOutcome {
    /// Nothing typed yet; no check was run
    Idle,
    /// The result for the most recent input
    Current(AvailabilityResult),
    /// Newer input arrived; this result must be discarded
    Superseded,
}

/// Debounced availability checker for live form input
pub struct RealTimeValidator<L: UsernameLookup> {
    service: Arc<AvailabilityService<L>>,
    generation: AtomicU64,
}

impl<L: UsernameLookup + 'static> RealTimeValidator<L> {
    pub fn new(service: Arc<AvailabilityService<L>>) -> Self {
        Self {
            service,
            generation: AtomicU64::new(0),
        }
    }

    /// Synchronous format feedback; safe to call on every keystroke
    pub fn validate(&self, username: &str) -> Result<(), FormatViolation> {
        self.service.validate_real_time(username)
    }

    /// Invalidate any in-flight check (e.g. the field was cleared)
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Debounced check for the latest input
    pub async fn check(&self, username: &str) -> RealTimeOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if username.is_empty() {
            return RealTimeOutcome::Idle;
        }

        let check_id = Uuid::new_v4();
        tokio::time::sleep(self.service.config().debounce).await;
        if !self.is_current(generation) {
            debug!(%check_id, username = %username, "Check superseded during debounce");
            return RealTimeOutcome::Superseded;
        }

        let result = self.service.check_availability(username).await;
        if !self.is_current(generation) {
            debug!(%check_id, username = %username, "Discarding stale check result");
            return RealTimeOutcome::Superseded;
        }

        debug!(%check_id, username = %username, available = result.is_available(), "Check complete");
        RealTimeOutcome::Current(result)
    }
}
