//! Client-side state and synchronization layer for a personal job-application tracker.
//!
//! The [`applications`] module owns the record model, the remote gateway, the list store,
//! the draft form, derived statistics, and CSV export. Everything else here is the ambient
//! plumbing shared with front ends: configuration, telemetry, and the top-level error type.

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
