use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::domain::{DiscourseRelation, Event, Participant, Passage, Relation, Stage};
use crate::snapshot::AiSnapshot;
use crate::validation::ValidationState;

use super::StorageError;

/// Name of the single durable record holding the session.
pub const SESSION_RECORD: &str = "meaning_map_session";

/// The validated-id sets in their persisted form: plain ordered sequences.
/// Sets do not survive generic serialization into string storage, so the
/// conversion is explicit in both directions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedValidation {
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub relations: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub discourse: Vec<String>,
}

impl PersistedValidation {
    pub fn from_state(state: &ValidationState) -> Self {
        PersistedValidation {
            participants: state.ids_sorted(Stage::Participants),
            relations: state.ids_sorted(Stage::Relations),
            events: state.ids_sorted(Stage::Events),
            discourse: state.ids_sorted(Stage::Discourse),
        }
    }

    pub fn into_state(self) -> ValidationState {
        let mut state = ValidationState::new();
        state.restore(Stage::Participants, self.participants);
        state.restore(Stage::Relations, self.relations);
        state.restore(Stage::Events, self.events);
        state.restore(Stage::Discourse, self.discourse);
        state
    }
}

/// The full persisted projection of a session. Written after every store
/// mutation and merged back in on startup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub passage_data: Option<Passage>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub discourse: Vec<DiscourseRelation>,
    #[serde(default)]
    pub ai_snapshot: Option<AiSnapshot>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub bhsa_loaded: bool,
    #[serde(default)]
    pub validated: PersistedValidation,
}

impl PersistedSession {
    /// Encode for a string-valued record: JSON, base64-armored so the value
    /// stays opaque to whatever wraps the storage backend.
    pub fn encode(&self) -> Result<String, StorageError> {
        let bytes = serde_json::to_vec(self).map_err(|e| StorageError::Codec(e.to_string()))?;
        Ok(STANDARD.encode(bytes))
    }

    pub fn decode(value: &str) -> Result<Self, StorageError> {
        let bytes = STANDARD
            .decode(value)
            .map_err(|e| StorageError::Codec(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_sets_round_trip_as_sequences() {
        let mut state = ValidationState::new();
        state.validate_all(Stage::Participants, ["b", "a"]);
        state.toggle(Stage::Events, "e1");

        let persisted = PersistedValidation::from_state(&state);
        // ordered sequence on the wire, membership-equal set after reload
        assert_eq!(persisted.participants, vec!["a", "b"]);
        assert_eq!(persisted.relations, Vec::<String>::new());

        let restored = persisted.into_state();
        assert_eq!(restored, state);
        assert!(restored.is_validated(Stage::Participants, "a"));
        assert!(restored.is_validated(Stage::Participants, "b"));
        assert_eq!(restored.count(Stage::Participants), 2);
    }

    #[test]
    fn session_encode_decode_round_trip() {
        let mut session = PersistedSession::default();
        session.participants.push(Participant::new("p1", "יהוה", "LORD"));
        session.snapshot_id = Some("snap-1".to_string());
        session.bhsa_loaded = true;
        session.validated.participants = vec!["srv-1".to_string()];

        let encoded = session.encode().unwrap();
        let decoded = PersistedSession::decode(&encoded).unwrap();
        assert_eq!(decoded, session);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            PersistedSession::decode("not base64!!"),
            Err(StorageError::Codec(_))
        ));

        let not_json = STANDARD.encode(b"hello");
        assert!(matches!(
            PersistedSession::decode(&not_json),
            Err(StorageError::Codec(_))
        ));
    }

    #[test]
    fn missing_fields_default_empty() {
        let bytes = serde_json::to_vec(&serde_json::json!({})).unwrap();
        let encoded = STANDARD.encode(bytes);
        let decoded = PersistedSession::decode(&encoded).unwrap();
        assert_eq!(decoded, PersistedSession::default());
    }
}
