mod support;

use std::sync::Arc;

use meaning_map::{
    AnnotationSession, InMemorySessionStore, PersistedSession, SessionStore, Stage,
    SESSION_RECORD,
};
use support::{ai_fixture, PASSAGE_ID};

fn session_with_storage(
    fixture: &support::Fixture,
    storage: InMemorySessionStore,
) -> AnnotationSession {
    AnnotationSession::with_storage(
        Arc::new(fixture.api.clone()),
        Arc::new(fixture.analysis.clone()),
        Arc::new(fixture.metrics.clone()),
        Arc::new(storage),
    )
}

#[test]
fn session_survives_a_reload() {
    let fixture = ai_fixture();
    let storage = InMemorySessionStore::new();

    {
        let mut session = session_with_storage(&fixture, storage.clone());
        session.load_passage(PASSAGE_ID).unwrap();
        session.run_ai_analysis("").unwrap();
        session
            .store_mut()
            .validate_all(Stage::Participants, ["srv-1", "srv-2"]);
        session.store_mut().set_bhsa_loaded(true);
    }

    // fresh session over the same storage: the reload path
    let session = session_with_storage(&fixture, storage);
    let store = session.store();

    assert_eq!(store.passage().unwrap().id, PASSAGE_ID);
    assert_eq!(store.participants().len(), 2);
    assert_eq!(store.relations().len(), 1);
    assert_eq!(store.events().len(), 2);
    assert_eq!(store.discourse().len(), 1);
    assert!(store.bhsa_loaded());
    assert!(store.ai_snapshot().is_some());
    assert!(store.snapshot_id().is_some());

    // the validated ids come back as a set, order-independent
    assert_eq!(store.get_validation_count(Stage::Participants), 2);
    assert!(store.validated().is_validated(Stage::Participants, "srv-1"));
    assert!(store.validated().is_validated(Stage::Participants, "srv-2"));
    assert!(store.is_stage_fully_validated(Stage::Participants, ["srv-2", "srv-1"]));
}

#[test]
fn validated_sets_are_stored_as_sequences() {
    let fixture = ai_fixture();
    let storage = InMemorySessionStore::new();

    let mut session = session_with_storage(&fixture, storage.clone());
    session.load_passage(PASSAGE_ID).unwrap();
    session
        .store_mut()
        .validate_all(Stage::Events, ["e-b", "e-a"]);

    let raw = storage.get(SESSION_RECORD).unwrap().expect("record written");
    let persisted = PersistedSession::decode(&raw).unwrap();
    assert_eq!(persisted.validated.events, vec!["e-a", "e-b"]);
    assert!(persisted.validated.participants.is_empty());
}

#[test]
fn discard_removes_the_record() {
    let fixture = ai_fixture();
    let storage = InMemorySessionStore::new();

    let mut session = session_with_storage(&fixture, storage.clone());
    session.load_passage(PASSAGE_ID).unwrap();
    assert!(storage.contains(SESSION_RECORD));

    session.discard();
    assert!(!storage.contains(SESSION_RECORD));

    // a later session starts fresh
    let session = session_with_storage(&fixture, storage);
    assert!(session.store().passage().is_none());
}

#[test]
fn fresh_storage_means_fresh_session() {
    let fixture = ai_fixture();
    let session = session_with_storage(&fixture, InMemorySessionStore::new());
    let store = session.store();

    assert!(store.passage().is_none());
    assert!(store.participants().is_empty());
    assert!(store.ai_snapshot().is_none());
    for stage in Stage::ALL {
        assert_eq!(store.get_validation_count(stage), 0);
    }
}
