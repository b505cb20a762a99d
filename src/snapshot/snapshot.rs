use serde::{Deserialize, Serialize};

use crate::domain::{DiscourseRelation, Event, Participant, Relation};

/// The participant/relation half of an AI analysis response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase1Result {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<Participant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<Relation>>,
}

/// The event/discourse half of an AI analysis response. Produced only after
/// phase 1 has been applied, since it builds on phase 1's participants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase2Result {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discourse: Option<Vec<DiscourseRelation>>,
}

/// Immutable capture of a full AI analysis payload.
///
/// Taken once per analysis run and used only for edit-provenance comparison:
/// a record that matches the snapshot is considered AI-originated. Matching
/// is heuristic: entity ids are not guaranteed stable between the AI payload
/// and the persisted records, so each entity matches on the most durable key
/// it has. Mismatches are expected noise, not a bug.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSnapshot {
    pub participants: Vec<Participant>,
    pub relations: Vec<Relation>,
    pub events: Vec<Event>,
    pub discourse: Vec<DiscourseRelation>,
}

impl AiSnapshot {
    /// Combine the two phase payloads into one capture. Missing halves
    /// capture as empty.
    pub fn from_phases(phase1: &Phase1Result, phase2: &Phase2Result) -> Self {
        AiSnapshot {
            participants: phase1.participants.clone().unwrap_or_default(),
            relations: phase1.relations.clone().unwrap_or_default(),
            events: phase2.events.clone().unwrap_or_default(),
            discourse: phase2.discourse.clone().unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
            && self.relations.is_empty()
            && self.events.is_empty()
            && self.discourse.is_empty()
    }

    /// Participants match by Hebrew text.
    pub fn contains_participant(&self, participant: &Participant) -> bool {
        self.participants.iter().any(|p| p.hebrew == participant.hebrew)
    }

    /// Relations match by the source/target/type triple.
    pub fn contains_relation(&self, relation: &Relation) -> bool {
        self.relations.iter().any(|r| {
            r.source == relation.source
                && r.target == relation.target
                && r.relation_type == relation.relation_type
        })
    }

    /// Events match by their event core gloss.
    pub fn contains_event(&self, event: &Event) -> bool {
        self.events.iter().any(|e| e.core == event.core)
    }

    /// Discourse relations match loosely by relation type only; nothing more
    /// durable survives the round trip through the collaborator API.
    pub fn contains_discourse(&self, discourse: &DiscourseRelation) -> bool {
        self.discourse
            .iter()
            .any(|d| d.relation_type == discourse.relation_type)
    }
}
