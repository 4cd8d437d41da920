//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for signup and registration callers
//! - Driven Ports (outbound) - Lookup service and hydration source

pub mod inbound;
pub mod outbound;

pub use inbound::{AcceptedVia, AvailabilityResult, UsernameAvailabilityApi};
pub use outbound::{LookupResponse, SnapshotSource, UsernameLookup, UsernameRegistry};
