use crate::snapshot::{Phase1Result, Phase2Result};

use super::ApiError;

/// The AI analysis collaborator. Phase 1 proposes participants and
/// relations; phase 2 builds events and discourse relations on top of
/// phase 1's output, so callers await phase 1 fully before starting phase 2.
pub trait AiAnalysis: Send + Sync {
    fn phase1(&self, reference: &str, context: &str) -> Result<Phase1Result, ApiError>;
    fn phase2(&self, reference: &str, context: &str) -> Result<Phase2Result, ApiError>;
}
