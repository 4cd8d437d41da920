//! Service Layer
//!
//! Application services that orchestrate domain logic and coordinate with
//! external dependencies via ports.

pub mod availability_service;
pub mod realtime;
pub mod shared_filter;

pub use availability_service::AvailabilityService;
pub use realtime::{RealTimeOutcome, RealTimeValidator};
pub use shared_filter::SharedFilter;
