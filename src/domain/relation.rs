use serde::{Deserialize, Serialize};

use super::Participant;

/// A directed relation between two participants.
///
/// `source` and `target` carry participant references (short codes, or server
/// ids once persisted). The denormalized `source_participant` and
/// `target_participant` copies are filled in by the collaborator API for
/// display convenience and are never authoritative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub category: String,
    /// Free-text type label within the category, e.g. "father of".
    pub relation_type: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_participant: Option<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_participant: Option<Participant>,
}

impl Relation {
    pub fn new(
        category: impl Into<String>,
        relation_type: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Relation {
            id: None,
            category: category.into(),
            relation_type: relation_type.into(),
            source: source.into(),
            target: target.into(),
            source_participant: None,
            target_participant: None,
        }
    }

    /// True when both endpoints are filled in. Checked before any
    /// collaborator call is made.
    pub fn has_endpoints(&self) -> bool {
        !self.source.is_empty() && !self.target.is_empty()
    }
}
