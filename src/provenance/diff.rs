use serde::Serialize;

use crate::domain::{DiscourseRelation, Event, Participant, Relation};

/// One tracked field that changed between the in-memory original and the
/// submitted form value.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: String,
    pub new: String,
}

fn push_if_changed(changes: &mut Vec<FieldChange>, field: &'static str, old: &str, new: &str) {
    if old != new {
        changes.push(FieldChange {
            field,
            old: old.to_string(),
            new: new.to_string(),
        });
    }
}

fn push_opt(
    changes: &mut Vec<FieldChange>,
    field: &'static str,
    old: &Option<String>,
    new: &Option<String>,
) {
    push_if_changed(
        changes,
        field,
        old.as_deref().unwrap_or(""),
        new.as_deref().unwrap_or(""),
    );
}

// List-valued fields are compared and reported in their JSON form; a reviewer
// reads the diff, nothing parses it back.
fn push_json<T: Serialize>(changes: &mut Vec<FieldChange>, field: &'static str, old: &T, new: &T) {
    let old = serde_json::to_string(old).unwrap_or_default();
    let new = serde_json::to_string(new).unwrap_or_default();
    push_if_changed(changes, field, &old, &new);
}

/// Tracked participant fields: code, hebrew, gloss, type, quantity,
/// reference status, properties.
pub fn diff_participant(original: &Participant, updated: &Participant) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    push_if_changed(&mut changes, "code", &original.code, &updated.code);
    push_if_changed(&mut changes, "hebrew", &original.hebrew, &updated.hebrew);
    push_if_changed(&mut changes, "gloss", &original.gloss, &updated.gloss);
    push_if_changed(
        &mut changes,
        "participant_type",
        &original.participant_type,
        &updated.participant_type,
    );
    push_if_changed(&mut changes, "quantity", &original.quantity, &updated.quantity);
    push_if_changed(
        &mut changes,
        "reference_status",
        &original.reference_status,
        &updated.reference_status,
    );
    push_json(&mut changes, "properties", &original.properties, &updated.properties);
    changes
}

/// Tracked relation fields: category, type label, both endpoints. The
/// denormalized participant copies are display-only and never diffed.
pub fn diff_relation(original: &Relation, updated: &Relation) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    push_if_changed(&mut changes, "category", &original.category, &updated.category);
    push_if_changed(
        &mut changes,
        "relation_type",
        &original.relation_type,
        &updated.relation_type,
    );
    push_if_changed(&mut changes, "source", &original.source, &updated.source);
    push_if_changed(&mut changes, "target", &original.target, &updated.target);
    changes
}

/// Tracked event fields: code, clause ref, category, core, function tags,
/// roles. The opaque extras bag is passed through, not tracked.
pub fn diff_event(original: &Event, updated: &Event) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    push_if_changed(&mut changes, "code", &original.code, &updated.code);
    push_opt(&mut changes, "clause_id", &original.clause_id, &updated.clause_id);
    push_if_changed(&mut changes, "category", &original.category, &updated.category);
    push_if_changed(&mut changes, "core", &original.core, &updated.core);
    push_opt(
        &mut changes,
        "discourse_function",
        &original.discourse_function,
        &updated.discourse_function,
    );
    push_opt(
        &mut changes,
        "narrative_function",
        &original.narrative_function,
        &updated.narrative_function,
    );
    push_json(&mut changes, "roles", &original.roles, &updated.roles);
    changes
}

/// Tracked discourse fields: relation type and both event endpoints.
pub fn diff_discourse(original: &DiscourseRelation, updated: &DiscourseRelation) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    push_if_changed(
        &mut changes,
        "relation_type",
        original.relation_type.as_str(),
        updated.relation_type.as_str(),
    );
    push_if_changed(&mut changes, "source", &original.source, &updated.source);
    push_if_changed(&mut changes, "target", &original.target, &updated.target);
    changes
}
