//! Job application records and the client-side state kept in sync with the remote table.
//!
//! Local state is never changed optimistically: every mutation goes through an
//! [`ApplicationGateway`] and is followed by a full [`ApplicationListStore::refresh`], so the
//! list always mirrors the last confirmed server snapshot.

pub mod domain;
pub mod export;
pub mod form;
pub mod gateway;
pub mod memory;
pub mod rest;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationId, ApplicationRecord, ApplicationStatus, NewApplication, UnknownStatus};
pub use export::{export_csv, CsvExport, DirectorySink, ExportError, ExportSink, CSV_HEADER};
pub use form::{DraftEdit, DraftForm, DraftFormController, FormError, FormState};
pub use gateway::{ApplicationGateway, RemoteError, RemoteOperation};
pub use memory::InMemoryGateway;
pub use rest::{RestError, RestGateway};
pub use stats::{followups_due, status_breakdown, DerivedStats, StatusCount};
pub use store::{ApplicationListStore, ListSnapshot, LoadState};
pub use tracker::{ApplicationTracker, ConfirmationPrompt, MutationOutcome, TrackerError};
pub use validation::{validate_draft, ValidationError};
