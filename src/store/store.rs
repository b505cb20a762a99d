use std::fmt;
use std::sync::Arc;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

use crate::api::MetricsApi;
use crate::domain::{DiscourseRelation, Event, Participant, Passage, Relation, Stage};
use crate::persist::{PersistedSession, PersistedValidation, SessionStore, SESSION_RECORD};
use crate::provenance::EditRecord;
use crate::snapshot::AiSnapshot;
use crate::validation::ValidationState;

/// Single source of truth for the current annotation session.
///
/// Holds the active passage, the four entity collections, the per-stage
/// validation sets, and the AI snapshot used for provenance comparison. All
/// mutation goes through the action methods below; none of them returns an
/// error. Collaborator failures are handled at the session boundary, and
/// the store is always left in a renderable state.
///
/// Every mutation notifies emitter subscribers (under the `emitter` feature)
/// and re-persists the session projection when storage is attached. Persist
/// failures are logged and swallowed; they never interrupt a state
/// transition.
pub struct PassageStore {
    passage: Option<Passage>,
    participants: Vec<Participant>,
    relations: Vec<Relation>,
    events: Vec<Event>,
    discourse: Vec<DiscourseRelation>,
    loading: bool,
    error: Option<String>,
    bhsa_loaded: bool,
    ai_snapshot: Option<AiSnapshot>,
    snapshot_id: Option<String>,
    validated: ValidationState,
    metrics: Option<Arc<dyn MetricsApi>>,
    storage: Option<Arc<dyn SessionStore>>,
    record_name: String,
    #[cfg(feature = "emitter")]
    emitter: EventEmitter,
}

impl Default for PassageStore {
    fn default() -> Self {
        PassageStore {
            passage: None,
            participants: Vec::new(),
            relations: Vec::new(),
            events: Vec::new(),
            discourse: Vec::new(),
            loading: false,
            error: None,
            bhsa_loaded: false,
            ai_snapshot: None,
            snapshot_id: None,
            validated: ValidationState::new(),
            metrics: None,
            storage: None,
            record_name: SESSION_RECORD.to_string(),
            #[cfg(feature = "emitter")]
            emitter: EventEmitter::new(),
        }
    }
}

impl fmt::Debug for PassageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassageStore")
            .field("passage", &self.passage.as_ref().map(|p| &p.id))
            .field("participants", &self.participants.len())
            .field("relations", &self.relations.len())
            .field("events", &self.events.len())
            .field("discourse", &self.discourse.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("bhsa_loaded", &self.bhsa_loaded)
            .field("snapshot_id", &self.snapshot_id)
            .finish()
    }
}

impl PassageStore {
    pub fn new() -> Self {
        PassageStore::default()
    }

    /// Use a different record name in durable storage. Set this before
    /// attaching storage, since attaching rehydrates from the current name.
    pub fn with_record_name(mut self, name: impl Into<String>) -> Self {
        self.record_name = name.into();
        self
    }

    /// Attach the metrics collaborator used by `track_edit`.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsApi>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Attach durable storage and rehydrate from it. A missing record means
    /// a fresh session; an unreadable one is logged and ignored.
    pub fn with_storage(mut self, storage: Arc<dyn SessionStore>) -> Self {
        match storage.get(&self.record_name) {
            Ok(Some(value)) => match PersistedSession::decode(&value) {
                Ok(session) => self.apply(session),
                Err(err) => eprintln!("[meaning_map] discarding unreadable session: {}", err),
            },
            Ok(None) => {}
            Err(err) => eprintln!("[meaning_map] session load failed: {}", err),
        }
        self.storage = Some(storage);
        self
    }

    // --- state ---

    pub fn passage(&self) -> Option<&Passage> {
        self.passage.as_ref()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn discourse(&self) -> &[DiscourseRelation] {
        &self.discourse
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn bhsa_loaded(&self) -> bool {
        self.bhsa_loaded
    }

    pub fn ai_snapshot(&self) -> Option<&AiSnapshot> {
        self.ai_snapshot.as_ref()
    }

    pub fn snapshot_id(&self) -> Option<&str> {
        self.snapshot_id.as_deref()
    }

    pub fn validated(&self) -> &ValidationState {
        &self.validated
    }

    // --- passage and collections ---

    /// Replace the active passage wholesale and clear any error. Never a
    /// merge with the previous passage.
    pub fn set_passage_data(&mut self, data: Passage) {
        self.passage = Some(data);
        self.error = None;
        self.changed("passage");
    }

    pub fn set_participants(&mut self, list: Vec<Participant>) {
        self.participants = list;
        self.changed("participants");
    }

    /// Function form of `set_participants`: replace the collection with a
    /// function of its previous value, for atomic append/remove/merge.
    pub fn update_participants<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<Participant>) -> Vec<Participant>,
    {
        let list = std::mem::take(&mut self.participants);
        self.participants = f(list);
        self.changed("participants");
    }

    pub fn set_relations(&mut self, list: Vec<Relation>) {
        self.relations = list;
        self.changed("relations");
    }

    pub fn update_relations<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<Relation>) -> Vec<Relation>,
    {
        let list = std::mem::take(&mut self.relations);
        self.relations = f(list);
        self.changed("relations");
    }

    pub fn set_events(&mut self, list: Vec<Event>) {
        self.events = list;
        self.changed("events");
    }

    pub fn update_events<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<Event>) -> Vec<Event>,
    {
        let list = std::mem::take(&mut self.events);
        self.events = f(list);
        self.changed("events");
    }

    pub fn set_discourse(&mut self, list: Vec<DiscourseRelation>) {
        self.discourse = list;
        self.changed("discourse");
    }

    pub fn update_discourse<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<DiscourseRelation>) -> Vec<DiscourseRelation>,
    {
        let list = std::mem::take(&mut self.discourse);
        self.discourse = f(list);
        self.changed("discourse");
    }

    // --- flags ---

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.changed("loading");
    }

    /// Set (or clear) the error message. Setting an error always forces
    /// loading off, so a request that fails leaves no spinner behind.
    pub fn set_error(&mut self, message: impl Into<Option<String>>) {
        self.error = message.into();
        if self.error.is_some() {
            self.loading = false;
        }
        self.changed("error");
    }

    pub fn set_bhsa_loaded(&mut self, loaded: bool) {
        self.bhsa_loaded = loaded;
        self.changed("bhsa");
    }

    // --- session reset ---

    /// Discard the whole session in one transition: passage, all four
    /// collections, the AI snapshot and its id, validation, and any error.
    /// The persisted record is dropped rather than rewritten empty.
    pub fn clear_passage(&mut self) {
        self.passage = None;
        self.participants.clear();
        self.relations.clear();
        self.events.clear();
        self.discourse.clear();
        self.ai_snapshot = None;
        self.snapshot_id = None;
        self.validated.clear();
        self.error = None;
        self.loading = false;
        self.notify("cleared");
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.remove(&self.record_name) {
                eprintln!("[meaning_map] failed to drop persisted session: {}", err);
            }
        }
    }

    // --- AI snapshot & provenance ---

    /// Capture an AI analysis payload. Overwrites any prior capture; only
    /// the most recent run is used for provenance comparison.
    pub fn set_ai_snapshot(&mut self, data: AiSnapshot, snapshot_id: impl Into<String>) {
        self.ai_snapshot = Some(data);
        self.snapshot_id = Some(snapshot_id.into());
        self.changed("snapshot");
    }

    /// Best-effort audit call. Silently a no-op without a snapshot id or a
    /// metrics collaborator; a failing collaborator is logged and swallowed.
    /// Never an error, never a panic.
    pub fn track_edit(&self, record: EditRecord) {
        let Some(snapshot_id) = &self.snapshot_id else {
            return;
        };
        let Some(metrics) = &self.metrics else {
            return;
        };
        if let Err(err) = metrics.log_edit(snapshot_id, &record) {
            eprintln!("[meaning_map] edit tracking failed: {}", err);
        }
    }

    // --- validation ---

    pub fn toggle_validation(&mut self, stage: Stage, id: impl Into<String>) -> bool {
        let validated = self.validated.toggle(stage, id);
        self.changed("validation");
        validated
    }

    pub fn validate_all<I, S>(&mut self, stage: Stage, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validated.validate_all(stage, ids);
        self.changed("validation");
    }

    pub fn is_stage_fully_validated<'a, I>(&self, stage: Stage, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.validated.is_fully_validated(stage, ids)
    }

    pub fn get_validation_count(&self, stage: Stage) -> usize {
        self.validated.count(stage)
    }

    pub fn clear_validation(&mut self) {
        self.validated.clear();
        self.changed("validation");
    }

    // --- persistence & notification ---

    fn project(&self) -> PersistedSession {
        PersistedSession {
            passage_data: self.passage.clone(),
            participants: self.participants.clone(),
            relations: self.relations.clone(),
            events: self.events.clone(),
            discourse: self.discourse.clone(),
            ai_snapshot: self.ai_snapshot.clone(),
            snapshot_id: self.snapshot_id.clone(),
            bhsa_loaded: self.bhsa_loaded,
            validated: PersistedValidation::from_state(&self.validated),
        }
    }

    fn apply(&mut self, session: PersistedSession) {
        self.passage = session.passage_data;
        self.participants = session.participants;
        self.relations = session.relations;
        self.events = session.events;
        self.discourse = session.discourse;
        self.ai_snapshot = session.ai_snapshot;
        self.snapshot_id = session.snapshot_id;
        self.bhsa_loaded = session.bhsa_loaded;
        self.validated = session.validated.into_state();
    }

    fn changed(&mut self, topic: &'static str) {
        self.notify(topic);
        self.persist();
    }

    fn notify(&mut self, topic: &'static str) {
        #[cfg(feature = "emitter")]
        self.emitter.emit(topic, ());
        #[cfg(not(feature = "emitter"))]
        let _ = topic;
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        match self.project().encode() {
            Ok(value) => {
                if let Err(err) = storage.put(&self.record_name, &value) {
                    eprintln!("[meaning_map] session persist failed: {}", err);
                }
            }
            Err(err) => eprintln!("[meaning_map] session encode failed: {}", err),
        }
    }

    /// Subscribe to a change topic (`"passage"`, `"participants"`,
    /// `"relations"`, `"events"`, `"discourse"`, `"loading"`, `"error"`,
    /// `"bhsa"`, `"snapshot"`, `"validation"`, `"cleared"`). Returns the
    /// listener id.
    #[cfg(feature = "emitter")]
    pub fn on<F, T>(&mut self, topic: &str, callback: F) -> String
    where
        for<'de> T: serde::Deserialize<'de>,
        F: Fn(T) + 'static + Sync + Send,
    {
        self.emitter.on(topic, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordingMetrics;
    use crate::persist::InMemorySessionStore;
    use crate::provenance::EntityKind;

    fn passage() -> Passage {
        Passage {
            id: "ps-1".to_string(),
            reference: "Genesis 1:1".to_string(),
            source_language: "hbo".to_string(),
            clauses: Vec::new(),
            display_units: None,
        }
    }

    fn snapshot_with_participant() -> AiSnapshot {
        AiSnapshot {
            participants: vec![Participant::new("p1", "יהוה", "LORD")],
            ..AiSnapshot::default()
        }
    }

    #[test]
    fn set_passage_data_replaces_and_clears_error() {
        let mut store = PassageStore::new();
        store.set_error(Some("boom".to_string()));
        store.set_passage_data(passage());
        assert_eq!(store.error(), None);
        assert_eq!(store.passage().unwrap().id, "ps-1");
    }

    #[test]
    fn set_error_forces_loading_off() {
        let mut store = PassageStore::new();
        store.set_loading(true);
        assert!(store.loading());

        store.set_error(Some("x".to_string()));
        assert!(!store.loading());
        assert_eq!(store.error(), Some("x"));

        // clearing the error does not touch loading
        store.set_loading(true);
        store.set_error(None::<String>);
        assert!(store.loading());
    }

    #[test]
    fn update_form_supports_atomic_append_and_remove() {
        let mut store = PassageStore::new();
        store.set_participants(vec![Participant::new("p1", "אִישׁ", "man")]);

        store.update_participants(|mut list| {
            list.push(Participant::new("p2", "אִשָּׁה", "woman"));
            list
        });
        assert_eq!(store.participants().len(), 2);

        store.update_participants(|mut list| {
            list.retain(|p| p.code != "p1");
            list
        });
        assert_eq!(store.participants().len(), 1);
        assert_eq!(store.participants()[0].code, "p2");
    }

    #[test]
    fn clear_passage_resets_everything_in_one_transition() {
        let mut store = PassageStore::new();
        store.set_passage_data(passage());
        store.set_participants(vec![Participant::new("p1", "יהוה", "LORD")]);
        store.set_events(vec![Event::new("e1", "action", "create")]);
        store.set_ai_snapshot(snapshot_with_participant(), "snap-1");
        for stage in Stage::ALL {
            store.toggle_validation(stage, "id");
        }

        store.clear_passage();

        assert!(store.passage().is_none());
        assert!(store.participants().is_empty());
        assert!(store.relations().is_empty());
        assert!(store.events().is_empty());
        assert!(store.discourse().is_empty());
        assert!(store.ai_snapshot().is_none());
        assert!(store.snapshot_id().is_none());
        for stage in Stage::ALL {
            assert_eq!(store.get_validation_count(stage), 0);
        }
    }

    #[test]
    fn track_edit_noops_without_snapshot_id() {
        let metrics = RecordingMetrics::new();
        let store = PassageStore::new().with_metrics(Arc::new(metrics.clone()));

        store.track_edit(EditRecord::create(EntityKind::Participant, "srv-1"));
        assert!(metrics.edits().is_empty());
    }

    #[test]
    fn track_edit_logs_once_with_snapshot_id() {
        let metrics = RecordingMetrics::new();
        let mut store = PassageStore::new().with_metrics(Arc::new(metrics.clone()));
        store.set_ai_snapshot(AiSnapshot::default(), "snap-7");

        store.track_edit(EditRecord::create(EntityKind::Participant, "srv-1"));

        let scoped = metrics.scoped_edits();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].0, "snap-7");
        assert_eq!(scoped[0].1.entity_id, "srv-1");
        assert!(!scoped[0].1.ai_generated);
    }

    #[test]
    fn track_edit_swallows_collaborator_failure() {
        let metrics = RecordingMetrics::new();
        metrics.fail_requests(true);
        let mut store = PassageStore::new().with_metrics(Arc::new(metrics.clone()));
        store.set_ai_snapshot(AiSnapshot::default(), "snap-1");

        // must not panic or surface anything
        store.track_edit(EditRecord::create(EntityKind::Event, "srv-2"));
        assert!(metrics.edits().is_empty());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn newer_snapshot_overwrites_prior_capture() {
        let mut store = PassageStore::new();
        store.set_ai_snapshot(snapshot_with_participant(), "snap-1");
        store.set_ai_snapshot(AiSnapshot::default(), "snap-2");

        assert!(store.ai_snapshot().unwrap().is_empty());
        assert_eq!(store.snapshot_id(), Some("snap-2"));
    }

    #[test]
    fn mutations_persist_and_rehydrate_including_sets() {
        let storage = InMemorySessionStore::new();
        {
            let mut store = PassageStore::new().with_storage(Arc::new(storage.clone()));
            store.set_passage_data(passage());
            store.set_bhsa_loaded(true);
            store.validate_all(Stage::Participants, ["a", "b"]);
            store.set_ai_snapshot(snapshot_with_participant(), "snap-1");
        }

        let store = PassageStore::new().with_storage(Arc::new(storage));
        assert_eq!(store.passage().unwrap().id, "ps-1");
        assert!(store.bhsa_loaded());
        assert_eq!(store.snapshot_id(), Some("snap-1"));
        assert_eq!(store.get_validation_count(Stage::Participants), 2);
        assert!(store.validated().is_validated(Stage::Participants, "a"));
        assert!(store.validated().is_validated(Stage::Participants, "b"));
        assert!(store.is_stage_fully_validated(Stage::Participants, ["a", "b"]));
    }

    #[test]
    fn clear_passage_drops_the_persisted_record() {
        let storage = InMemorySessionStore::new();
        let mut store = PassageStore::new().with_storage(Arc::new(storage.clone()));
        store.set_passage_data(passage());
        assert!(storage.contains(SESSION_RECORD));

        store.clear_passage();
        assert!(!storage.contains(SESSION_RECORD));
    }

    #[test]
    fn unreadable_persisted_record_starts_fresh() {
        let storage = InMemorySessionStore::new();
        storage.put(SESSION_RECORD, "garbage").unwrap();

        let store = PassageStore::new().with_storage(Arc::new(storage));
        assert!(store.passage().is_none());
        assert_eq!(store.get_validation_count(Stage::Events), 0);
    }

    #[test]
    fn custom_record_name_is_respected() {
        let storage = InMemorySessionStore::new();
        let mut store = PassageStore::new()
            .with_record_name("scratch_session")
            .with_storage(Arc::new(storage.clone()));
        store.set_bhsa_loaded(true);

        assert!(storage.contains("scratch_session"));
        assert!(!storage.contains(SESSION_RECORD));
    }

    #[cfg(feature = "emitter")]
    #[test]
    fn emitter_notifies_on_mutation() {
        use std::sync::mpsc;
        use std::time::Duration;

        let mut store = PassageStore::new();
        let (tx, rx) = mpsc::channel();
        store.on("participants", move |_: ()| {
            let _ = tx.send(());
        });

        store.set_participants(Vec::new());

        // listeners run off-thread
        rx.recv_timeout(Duration::from_secs(1))
            .expect("listener never fired");
    }
}
