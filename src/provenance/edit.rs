use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Stage;

/// What kind of mutation an edit record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Create,
    Update,
    Delete,
}

impl EditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::Create => "create",
            EditAction::Update => "update",
            EditAction::Delete => "delete",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which entity collection the edited record belongs to. Singular names on
/// the wire, per the metrics collaborator's contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Participant,
    Relation,
    Event,
    Discourse,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Participant => "participant",
            EntityKind::Relation => "relation",
            EntityKind::Event => "event",
            EntityKind::Discourse => "discourse",
        }
    }

    /// The validation stage holding this entity kind.
    pub fn stage(&self) -> Stage {
        match self {
            EntityKind::Participant => Stage::Participants,
            EntityKind::Relation => Stage::Relations,
            EntityKind::Event => Stage::Events,
            EntityKind::Discourse => Stage::Discourse,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record sent to the metrics collaborator. Field-level detail is
/// present only for updates; creates and deletes describe the whole record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub action: EditAction,
    pub entity: EntityKind,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub ai_generated: bool,
}

impl EditRecord {
    /// Creates are human-authored by definition, even during an AI session.
    pub fn create(entity: EntityKind, entity_id: impl Into<String>) -> Self {
        EditRecord {
            action: EditAction::Create,
            entity,
            entity_id: entity_id.into(),
            field: None,
            old_value: None,
            new_value: None,
            ai_generated: false,
        }
    }

    pub fn update(
        entity: EntityKind,
        entity_id: impl Into<String>,
        field: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
        ai_generated: bool,
    ) -> Self {
        EditRecord {
            action: EditAction::Update,
            entity,
            entity_id: entity_id.into(),
            field: Some(field.into()),
            old_value: Some(old_value.into()),
            new_value: Some(new_value.into()),
            ai_generated,
        }
    }

    pub fn delete(entity: EntityKind, entity_id: impl Into<String>, ai_generated: bool) -> Self {
        EditRecord {
            action: EditAction::Delete,
            entity,
            entity_id: entity_id.into(),
            field: None,
            old_value: None,
            new_value: None,
            ai_generated,
        }
    }
}
