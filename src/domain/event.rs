use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One semantic role slot of an event. `participant` is a participant
/// reference and stays `None` for unfilled slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
}

/// A mapped event: what happened in a clause, who filled which role, and how
/// it functions in the discourse.
///
/// The `extras` bag carries the optional semantic-annotation fields
/// (modifiers, speech-act, pragmatics, emotions, stance, key terms). The
/// store passes them through opaquely and never interprets them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// User-facing short handle, e.g. `e1`.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_id: Option<String>,
    pub category: String,
    /// Short gloss of the event core, e.g. "create".
    pub core: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discourse_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_function: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(flatten)]
    pub extras: HashMap<String, Value>,
}

impl Event {
    pub fn new(code: impl Into<String>, category: impl Into<String>, core: impl Into<String>) -> Self {
        Event {
            id: None,
            code: code.into(),
            clause_id: None,
            category: category.into(),
            core: core.into(),
            discourse_function: None,
            narrative_function: None,
            roles: Vec::new(),
            extras: HashMap::new(),
        }
    }
}
