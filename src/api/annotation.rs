use crate::domain::{DiscourseRelation, Event, Participant, Passage, Relation};

use super::ApiError;

/// The REST collaborator owning passages and the four entity collections.
///
/// Create calls return the persisted record (with its server-assigned id);
/// update calls return the record as the server now holds it, including any
/// denormalized display copies. Timeouts and retries are the implementor's
/// concern, not the session's.
pub trait AnnotationApi: Send + Sync {
    fn get_passage(&self, passage_id: &str) -> Result<Passage, ApiError>;

    /// Mark the passage's meaning map complete.
    fn finalize_passage(&self, passage_id: &str) -> Result<(), ApiError>;

    fn get_participants(&self, passage_id: &str) -> Result<Vec<Participant>, ApiError>;
    fn create_participant(
        &self,
        passage_id: &str,
        data: &Participant,
    ) -> Result<Participant, ApiError>;
    fn update_participant(&self, id: &str, data: &Participant) -> Result<Participant, ApiError>;
    fn delete_participant(&self, id: &str) -> Result<(), ApiError>;

    fn get_relations(&self, passage_id: &str) -> Result<Vec<Relation>, ApiError>;
    fn create_relation(&self, passage_id: &str, data: &Relation) -> Result<Relation, ApiError>;
    fn update_relation(&self, id: &str, data: &Relation) -> Result<Relation, ApiError>;
    fn delete_relation(&self, id: &str) -> Result<(), ApiError>;

    fn get_events(&self, passage_id: &str) -> Result<Vec<Event>, ApiError>;
    fn create_event(&self, passage_id: &str, data: &Event) -> Result<Event, ApiError>;
    fn update_event(&self, id: &str, data: &Event) -> Result<Event, ApiError>;
    fn delete_event(&self, id: &str) -> Result<(), ApiError>;

    fn get_discourse(&self, passage_id: &str) -> Result<Vec<DiscourseRelation>, ApiError>;
    fn create_discourse(
        &self,
        passage_id: &str,
        data: &DiscourseRelation,
    ) -> Result<DiscourseRelation, ApiError>;
    fn update_discourse(
        &self,
        id: &str,
        data: &DiscourseRelation,
    ) -> Result<DiscourseRelation, ApiError>;
    fn delete_discourse(&self, id: &str) -> Result<(), ApiError>;
}
