//! Filter and availability-check configuration
//!
//! # Example
//!
//! ```ignore
//! use username_filter::domain::AvailabilityConfigBuilder;
//! use std::time::Duration;
//!
//! let config = AvailabilityConfigBuilder::new()
//!     .expected_elements(50_000)
//!     .target_fpr(0.01)
//!     .lookup_timeout(Duration::from_secs(2))
//!     .build()
//!     .expect("Valid config");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Filter sizing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Expected number of usernames (n)
    pub expected_elements: usize,
    /// Target false positive rate (p), strictly between 0 and 1
    pub target_fpr: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            expected_elements: 50_000,
            target_fpr: 0.01,
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.expected_elements == 0 {
            return Err(FilterError::InvalidExpectedElements(self.expected_elements));
        }
        if !(self.target_fpr > 0.0 && self.target_fpr < 1.0) {
            return Err(FilterError::InvalidFalsePositiveRate {
                fpr: self.target_fpr,
            });
        }
        Ok(())
    }
}

/// Availability checking configuration
#[derive(Clone, Debug, PartialEq)]
pub struct AvailabilityConfig {
    /// Filter sizing
    pub filter: FilterConfig,
    /// Upper bound on one authoritative lookup
    pub lookup_timeout: Duration,
    /// Quiet period before a keystroke-triggered check runs
    pub debounce: Duration,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            lookup_timeout: Duration::from_secs(5),
            debounce: Duration::from_millis(300),
        }
    }
}

impl AvailabilityConfig {
    pub fn validate(&self) -> Result<(), FilterError> {
        self.filter.validate()?;
        if self.lookup_timeout.is_zero() {
            return Err(FilterError::InvalidParameters(
                "lookup_timeout cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for AvailabilityConfig with validation
#[derive(Default)]
pub struct AvailabilityConfigBuilder {
    expected_elements: Option<usize>,
    target_fpr: Option<f64>,
    lookup_timeout: Option<Duration>,
    debounce: Option<Duration>,
}

impl AvailabilityConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_elements(mut self, n: usize) -> Self {
        self.expected_elements = Some(n);
        self
    }

    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }

    /// Build the config, validating all parameters
    pub fn build(self) -> Result<AvailabilityConfig, FilterError> {
        let defaults = AvailabilityConfig::default();

        let config = AvailabilityConfig {
            filter: FilterConfig {
                expected_elements: self
                    .expected_elements
                    .unwrap_or(defaults.filter.expected_elements),
                target_fpr: self.target_fpr.unwrap_or(defaults.filter.target_fpr),
            },
            lookup_timeout: self.lookup_timeout.unwrap_or(defaults.lookup_timeout),
            debounce: self.debounce.unwrap_or(defaults.debounce),
        };

        config.validate()?;
        Ok(config)
    }
}
