//! Username Availability Service
//!
//! Orchestrates the two-tier check:
//!
//! ```text
//! validate_format ──invalid──→ InvalidFormat            (no probe)
//!        │
//!   filter probe ──miss──────→ Available(FilterMiss)    (no lookup)
//!        │ hit
//!   lookup (with timeout)
//!        ├─ taken ───────────→ Unavailable { suggestions }
//!        ├─ free ────────────→ Available(LookupConfirmed)
//!        └─ error/timeout ───→ CheckFailed
//! ```
//!
//! The filter is only updated through `record_registered_username`, after a
//! registration has been committed. Nothing here retries.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::domain::{
    generate_suggestions, validate_format, validate_real_time, AvailabilityConfig, BloomFilter,
    FilterSnapshot, FormatViolation,
};
use crate::error::{DataError, FilterError};
use crate::metrics::Metrics;
use crate::ports::{
    AcceptedVia, AvailabilityResult, SnapshotSource, UsernameAvailabilityApi, UsernameLookup,
    UsernameRegistry,
};

use super::shared_filter::SharedFilter;

const LOOKUP_FAILED: &str = "Failed to check username availability";
const LOOKUP_TIMED_OUT: &str = "Username availability check timed out";

/// Username availability service
///
/// Implements the `UsernameAvailabilityApi` port using an injected lookup
/// service and an owned filter handle.
pub struct AvailabilityService<L: UsernameLookup> {
    /// Authoritative lookup (driven port)
    lookup: Arc<L>,
    /// Process-wide filter
    filter: SharedFilter,
    config: AvailabilityConfig,
    metrics: Arc<Metrics>,
}

impl<L: UsernameLookup + 'static> AvailabilityService<L> {
    /// Create a service with a fresh, empty filter sized from `config`
    pub fn new(lookup: Arc<L>, config: AvailabilityConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let filter = BloomFilter::new(config.filter.expected_elements, config.filter.target_fpr)?;
        info!(
            size_bits = filter.size_bits(),
            hash_count = filter.hash_count(),
            expected_elements = config.filter.expected_elements,
            target_fpr = config.filter.target_fpr,
            "Username filter created"
        );
        Ok(Self::with_filter(lookup, SharedFilter::new(filter), config))
    }

    /// Create a service around an existing filter handle
    pub fn with_filter(lookup: Arc<L>, filter: SharedFilter, config: AvailabilityConfig) -> Self {
        Self {
            lookup,
            filter,
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn filter(&self) -> &SharedFilter {
        &self.filter
    }

    pub fn config(&self) -> &AvailabilityConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Warm the filter from a hydration source
    ///
    /// On failure the filter keeps whatever state it had.
    pub async fn hydrate<S>(&self, source: &S) -> Result<(), FilterError>
    where
        S: SnapshotSource + ?Sized,
    {
        let snapshot = source.fetch_snapshot().await.map_err(|e| {
            warn!(error = %e, "Failed to fetch filter snapshot");
            FilterError::Hydration(e)
        })?;
        self.import_filter_state(snapshot)?;

        let (size_bits, hash_count, bits_set) = self.filter.stats();
        info!(size_bits, hash_count, bits_set, "Username filter hydrated");
        Ok(())
    }

    /// Ask the authoritative lookup about a filter hit
    async fn confirm(&self, username: &str) -> AvailabilityResult {
        let started = Instant::now();
        match timeout(self.config.lookup_timeout, self.lookup.exists(username)).await {
            Err(_) => {
                self.metrics.record_lookup_failure();
                warn!(username = %username, timeout = ?self.config.lookup_timeout, "Lookup timed out");
                AvailabilityResult::CheckFailed(LOOKUP_TIMED_OUT.to_string())
            }
            Ok(Err(e)) => {
                self.metrics.record_lookup_failure();
                warn!(username = %username, error = %e, "Lookup failed");
                AvailabilityResult::CheckFailed(LOOKUP_FAILED.to_string())
            }
            Ok(Ok(response)) => {
                self.metrics.record_lookup(started.elapsed(), response.exists);
                if response.exists {
                    let suggestions = response
                        .suggestions
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| generate_suggestions(username));
                    debug!(username = %username, "Username confirmed taken");
                    AvailabilityResult::Unavailable { suggestions }
                } else {
                    debug!(username = %username, "Filter false positive; username is free");
                    AvailabilityResult::Available(AcceptedVia::LookupConfirmed)
                }
            }
        }
    }
}

impl<R: UsernameRegistry> AvailabilityService<R> {
    /// Check, commit, then record a username
    ///
    /// The filter learns the name once the registry reports a durable commit,
    /// or whenever the commit outcome is unknown (error or timeout).
    pub async fn register_username(&self, username: &str) -> AvailabilityResult
    where
        R: 'static,
    {
        let result = self.check_availability(username).await;
        if !result.is_available() {
            return result;
        }

        match timeout(self.config.lookup_timeout, self.lookup.register(username)).await {
            Ok(Ok(())) => {
                self.record_registered_username(username);
                result
            }
            Ok(Err(DataError::AlreadyExists(_))) => {
                // Lost a race with another signup; the name is taken now
                self.filter.add(username);
                AvailabilityResult::Unavailable {
                    suggestions: generate_suggestions(username),
                }
            }
            // Outcome unknown: the commit may have landed, so the filter must
            // stay a superset of the store
            Ok(Err(e)) => {
                self.filter.add(username);
                warn!(username = %username, error = %e, "Registration failed");
                AvailabilityResult::CheckFailed(LOOKUP_FAILED.to_string())
            }
            Err(_) => {
                self.filter.add(username);
                warn!(username = %username, "Registration timed out");
                AvailabilityResult::CheckFailed(LOOKUP_TIMED_OUT.to_string())
            }
        }
    }
}

#[async_trait]
impl<L: UsernameLookup + 'static> UsernameAvailabilityApi for AvailabilityService<L> {
    async fn check_availability(&self, username: &str) -> AvailabilityResult {
        if let Err(violation) = validate_format(username) {
            debug!(username = %username, reason = %violation, "Username rejected by format rules");
            return AvailabilityResult::InvalidFormat(violation);
        }

        let hit = self.filter.might_exist(username);
        self.metrics.record_probe(hit);

        if !hit {
            debug!(username = %username, "Filter miss; accepting without lookup");
            return AvailabilityResult::Available(AcceptedVia::FilterMiss);
        }

        self.confirm(username).await
    }

    fn validate_real_time(&self, username: &str) -> Result<(), FormatViolation> {
        validate_real_time(username)
    }

    fn record_registered_username(&self, username: &str) {
        self.filter.add(username);
        self.metrics.record_registration();
        info!(username = %username, "Registered username recorded in filter");
    }

    fn export_filter_state(&self) -> FilterSnapshot {
        self.filter.export()
    }

    fn import_filter_state(&self, snapshot: FilterSnapshot) -> Result<(), FilterError> {
        self.filter.import(snapshot).map_err(|e| {
            warn!(error = %e, "Rejected filter snapshot; keeping previous state");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::LookupResponse;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Mock lookup with a fixed taken set and a call counter
    struct MockLookup {
        taken: HashSet<String>,
        suggestions: Option<Vec<String>>,
        fail: bool,
        delay: Option<Duration>,
        /// Commit, then hang for this long before answering
        commit_stall: Option<Duration>,
        fail_register: bool,
        calls: AtomicUsize,
        registered: Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn new(taken: &[&str]) -> Self {
            Self {
                taken: taken.iter().map(|s| s.to_lowercase()).collect(),
                suggestions: None,
                fail: false,
                delay: None,
                commit_stall: None,
                fail_register: false,
                calls: AtomicUsize::new(0),
                registered: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UsernameLookup for MockLookup {
        async fn exists(&self, username: &str) -> Result<LookupResponse, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(DataError::ConnectionError("refused".to_string()));
            }
            if self.taken.contains(&username.to_lowercase()) {
                Ok(LookupResponse::taken(self.suggestions.clone()))
            } else {
                Ok(LookupResponse::available())
            }
        }
    }

    #[async_trait]
    impl UsernameRegistry for MockLookup {
        async fn register(&self, username: &str) -> Result<(), DataError> {
            if self.taken.contains(&username.to_lowercase()) {
                return Err(DataError::AlreadyExists(username.to_string()));
            }
            if self.fail_register {
                return Err(DataError::ConnectionError("primary unreachable".to_string()));
            }
            self.registered.lock().push(username.to_string());
            if let Some(stall) = self.commit_stall {
                tokio::time::sleep(stall).await;
            }
            Ok(())
        }

        async fn usernames(&self) -> Result<Vec<String>, DataError> {
            Ok(self.taken.iter().cloned().collect())
        }
    }

    fn service_with(lookup: MockLookup) -> (AvailabilityService<MockLookup>, Arc<MockLookup>) {
        let lookup = Arc::new(lookup);
        let config = AvailabilityConfig {
            lookup_timeout: Duration::from_millis(500),
            ..Default::default()
        };
        let service = AvailabilityService::new(Arc::clone(&lookup), config).unwrap();
        (service, lookup)
    }

    #[tokio::test]
    async fn test_invalid_format_skips_probe_and_lookup() {
        let (service, lookup) = service_with(MockLookup::new(&[]));

        let result = service.check_availability("admin").await;

        assert_eq!(
            result,
            AvailabilityResult::InvalidFormat(FormatViolation::Reserved)
        );
        assert_eq!(lookup.calls(), 0);
        assert_eq!(service.metrics().snapshot().probes, 0);
    }

    #[tokio::test]
    async fn test_filter_miss_accepts_without_lookup() {
        let (service, lookup) = service_with(MockLookup::new(&["johndoe"]));

        let result = service.check_availability("freshuser123").await;

        assert_eq!(result, AvailabilityResult::Available(AcceptedVia::FilterMiss));
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_filter_hit_confirmed_taken_returns_suggestions() {
        let (service, lookup) = service_with(MockLookup::new(&["johndoe"]));
        service.filter().add("johndoe");

        let result = service.check_availability("johndoe").await;

        assert_eq!(lookup.calls(), 1);
        assert_eq!(result.suggestions().len(), 5);
        assert_eq!(result.suggestions()[0], "johndoe1");
    }

    #[tokio::test]
    async fn test_lookup_suggestions_take_precedence() {
        let mut lookup = MockLookup::new(&["johndoe"]);
        lookup.suggestions = Some(vec!["john_the_great".to_string()]);
        let (service, _) = service_with(lookup);
        service.filter().add("johndoe");

        let result = service.check_availability("johndoe").await;

        assert_eq!(
            result,
            AvailabilityResult::Unavailable {
                suggestions: vec!["john_the_great".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_empty_lookup_suggestions_fall_back_to_generator() {
        let mut lookup = MockLookup::new(&["johndoe"]);
        lookup.suggestions = Some(vec![]);
        let (service, _) = service_with(lookup);
        service.filter().add("johndoe");

        let result = service.check_availability("johndoe").await;
        assert_eq!(result.suggestions()[0], "johndoe1");
    }

    #[tokio::test]
    async fn test_false_positive_confirmed_free() {
        let (service, lookup) = service_with(MockLookup::new(&[]));
        // Simulate a false positive by putting the name in the filter only
        service.filter().add("ghostuser");

        let result = service.check_availability("ghostuser").await;

        assert_eq!(
            result,
            AvailabilityResult::Available(AcceptedVia::LookupConfirmed)
        );
        assert_eq!(lookup.calls(), 1);
        assert_eq!(service.metrics().snapshot().false_positives, 1);
    }

    #[tokio::test]
    async fn test_lookup_error_is_check_failed_not_unavailable() {
        let mut lookup = MockLookup::new(&["johndoe"]);
        lookup.fail = true;
        let (service, _) = service_with(lookup);
        service.filter().add("johndoe");

        let result = service.check_availability("johndoe").await;

        assert!(matches!(result, AvailabilityResult::CheckFailed(_)));
        assert!(result.suggestions().is_empty());
        assert_eq!(service.metrics().snapshot().lookup_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_times_out() {
        let mut lookup = MockLookup::new(&["johndoe"]);
        lookup.delay = Some(Duration::from_secs(60));
        let (service, _) = service_with(lookup);
        service.filter().add("johndoe");

        let result = service.check_availability("johndoe").await;

        assert_eq!(
            result,
            AvailabilityResult::CheckFailed(LOOKUP_TIMED_OUT.to_string())
        );
    }

    #[tokio::test]
    async fn test_check_does_not_update_filter() {
        let (service, _) = service_with(MockLookup::new(&[]));

        assert!(service.check_availability("newcomer").await.is_available());
        assert!(!service.filter().might_exist("newcomer"));
    }

    #[tokio::test]
    async fn test_record_registered_username_updates_filter() {
        let (service, lookup) = service_with(MockLookup::new(&[]));

        service.record_registered_username("NewComer");

        assert!(service.filter().might_exist("newcomer"));
        // Next check must now go through the lookup
        let result = service.check_availability("newcomer").await;
        assert_eq!(
            result,
            AvailabilityResult::Available(AcceptedVia::LookupConfirmed)
        );
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_register_username_commits_then_records() {
        let (service, lookup) = service_with(MockLookup::new(&[]));

        let result = service.register_username("level_up").await;

        assert!(result.is_available());
        assert_eq!(*lookup.registered.lock(), vec!["level_up".to_string()]);
        assert!(service.filter().might_exist("level_up"));
        assert_eq!(service.metrics().snapshot().registrations, 1);
    }

    #[tokio::test]
    async fn test_register_username_race_reports_unavailable() {
        // Taken in the store but unknown to the filter
        let (service, _) = service_with(MockLookup::new(&["racer"]));

        let result = service.register_username("racer").await;

        assert_eq!(result.suggestions()[0], "racer1");
        assert!(service.filter().might_exist("racer"));
        assert_eq!(service.metrics().snapshot().registrations, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_timeout_after_commit_keeps_name_in_filter() {
        let mut lookup = MockLookup::new(&[]);
        lookup.commit_stall = Some(Duration::from_secs(60));
        let (service, lookup) = service_with(lookup);

        let result = service.register_username("slow_commit").await;

        assert_eq!(
            result,
            AvailabilityResult::CheckFailed(LOOKUP_TIMED_OUT.to_string())
        );
        assert_eq!(*lookup.registered.lock(), vec!["slow_commit".to_string()]);
        assert!(service.filter().might_exist("slow_commit"));
        assert_eq!(service.metrics().snapshot().registrations, 0);
    }

    #[tokio::test]
    async fn test_register_error_hides_details_and_keeps_name_in_filter() {
        let mut lookup = MockLookup::new(&[]);
        lookup.fail_register = true;
        let (service, _) = service_with(lookup);

        let result = service.register_username("unlucky").await;

        assert_eq!(
            result,
            AvailabilityResult::CheckFailed(LOOKUP_FAILED.to_string())
        );
        assert!(service.filter().might_exist("unlucky"));
    }

    struct FixedSnapshot(FilterSnapshot);

    #[async_trait]
    impl SnapshotSource for FixedSnapshot {
        async fn fetch_snapshot(&self) -> Result<FilterSnapshot, DataError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_hydrate_replaces_filter_state() {
        let (service, _) = service_with(MockLookup::new(&[]));
        let mut source_filter = BloomFilter::new(100, 0.01).unwrap();
        source_filter.add("pixel_art");

        service.hydrate(&FixedSnapshot(source_filter.export())).await.unwrap();

        assert!(service.filter().might_exist("pixel_art"));
        assert_eq!(service.filter().stats().0, source_filter.size_bits());
    }

    #[tokio::test]
    async fn test_hydrate_rejects_oversized_hash_count() {
        let (service, _) = service_with(MockLookup::new(&[]));
        service.record_registered_username("keeper");
        let before = service.export_filter_state();

        let mut hostile = before.clone();
        hostile.hash_function_count = (1usize << 32) + 1;
        let result = service.hydrate(&FixedSnapshot(hostile)).await;

        assert!(matches!(result, Err(FilterError::InvalidSnapshot(_))));
        assert_eq!(service.export_filter_state(), before);
    }

    #[tokio::test]
    async fn test_import_rejects_bad_snapshot_and_keeps_state() {
        let (service, _) = service_with(MockLookup::new(&[]));
        service.record_registered_username("keeper");
        let before = service.export_filter_state();

        let mut bad = before.clone();
        bad.hash_function_count = 0;
        assert!(service.import_filter_state(bad).is_err());

        assert_eq!(service.export_filter_state(), before);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AvailabilityConfig {
            filter: crate::domain::FilterConfig {
                expected_elements: 0,
                target_fpr: 0.01,
            },
            ..Default::default()
        };
        let result = AvailabilityService::new(Arc::new(MockLookup::new(&[])), config);
        assert!(matches!(result, Err(FilterError::InvalidExpectedElements(0))));
    }
}
