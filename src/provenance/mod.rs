//! Edit provenance: audit records and the field-diffing that feeds them.
//!
//! Provenance is a heuristic signal for metrics, never a verified change
//! log; record ids are not stable between the AI payload and the persisted
//! records, so AI-origin is decided by the snapshot match heuristics.

mod diff;
mod edit;

pub use diff::{diff_discourse, diff_event, diff_participant, diff_relation, FieldChange};
pub use edit::{EditAction, EditRecord, EntityKind};
