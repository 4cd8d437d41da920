//! Metrics for availability checks
//!
//! Counters for how often the fast path answers on its own, how often the
//! authoritative lookup is needed, and how often the filter was wrong.
//!
//! ## Usage
//!
//! ```ignore
//! let metrics = Metrics::new();
//! metrics.record_probe(false);
//! assert_eq!(metrics.snapshot().filter_negatives, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe counters for availability checks
#[derive(Default, Debug)]
pub struct Metrics {
    /// Filter probes performed
    pub probes: AtomicU64,
    /// Probes answered "definitely absent"
    pub filter_negatives: AtomicU64,
    /// Authoritative lookups issued
    pub lookups: AtomicU64,
    /// Lookups confirming the username is taken
    pub confirmed_taken: AtomicU64,
    /// Lookups revealing a filter false positive
    pub false_positives: AtomicU64,
    /// Lookups that errored or timed out
    pub lookup_failures: AtomicU64,
    /// Usernames recorded after registration
    pub registrations: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a filter probe and whether it hit
    pub fn record_probe(&self, hit: bool) {
        self.probes.fetch_add(1, Ordering::Relaxed);
        if !hit {
            self.filter_negatives.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed lookup
    pub fn record_lookup(&self, duration: Duration, exists: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if exists {
            self.confirmed_taken.fetch_add(1, Ordering::Relaxed);
        } else {
            self.false_positives.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_lookup_failure(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.lookup_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            probes: self.probes.load(Ordering::Relaxed),
            filter_negatives: self.filter_negatives.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            confirmed_taken: self.confirmed_taken.load(Ordering::Relaxed),
            false_positives: self.false_positives.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            avg_lookup_ns: self.avg_lookup_time_ns(),
        }
    }

    /// Average duration of completed lookups
    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let completed = self
            .lookups
            .load(Ordering::Relaxed)
            .saturating_sub(self.lookup_failures.load(Ordering::Relaxed));
        if completed > 0 {
            total / completed
        } else {
            0
        }
    }

    /// Share of filter hits that turned out to be false positives
    pub fn observed_false_positive_rate(&self) -> f64 {
        let confirmed = self.false_positives.load(Ordering::Relaxed)
            + self.confirmed_taken.load(Ordering::Relaxed);
        if confirmed > 0 {
            self.false_positives.load(Ordering::Relaxed) as f64 / confirmed as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.probes,
            &self.filter_negatives,
            &self.lookups,
            &self.confirmed_taken,
            &self.false_positives,
            &self.lookup_failures,
            &self.registrations,
            &self.lookup_time_ns,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub probes: u64,
    pub filter_negatives: u64,
    pub lookups: u64,
    pub confirmed_taken: u64,
    pub false_positives: u64,
    pub lookup_failures: u64,
    pub registrations: u64,
    pub avg_lookup_ns: u64,
}
