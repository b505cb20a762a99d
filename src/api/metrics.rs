use crate::provenance::EditRecord;
use crate::snapshot::AiSnapshot;

use super::ApiError;

/// The metrics collaborator. Both calls are best-effort telemetry: callers
/// log failures locally and never let them interrupt the primary workflow.
pub trait MetricsApi: Send + Sync {
    /// Register an AI analysis capture; returns the server-assigned
    /// snapshot id that scopes subsequent edit logging.
    fn create_snapshot(&self, passage_id: &str, payload: &AiSnapshot) -> Result<String, ApiError>;

    fn log_edit(&self, snapshot_id: &str, record: &EditRecord) -> Result<(), ApiError>;
}
