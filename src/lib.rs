mod api;
mod domain;
mod persist;
mod provenance;
mod session;
mod snapshot;
mod store;
mod validation;

pub use api::{
    AiAnalysis, AnnotationApi, ApiError, InMemoryAnnotationApi, MetricsApi, RecordingMetrics,
    ScriptedAnalysis,
};
pub use domain::{
    Clause, DiscourseRelation, DiscourseRelationType, DisplayUnit, Event, Participant, Passage,
    Property, Relation, Role, Stage,
};
pub use persist::{
    InMemorySessionStore, PersistedSession, PersistedValidation, SessionStore, StorageError,
    SESSION_RECORD,
};
pub use provenance::{
    diff_discourse, diff_event, diff_participant, diff_relation, EditAction, EditRecord,
    EntityKind, FieldChange,
};
pub use session::{AnnotationSession, SessionError};
pub use snapshot::{AiSnapshot, Phase1Result, Phase2Result};
pub use store::PassageStore;
pub use validation::ValidationState;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
