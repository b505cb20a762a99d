use std::sync::Arc;

use crate::api::{AiAnalysis, AnnotationApi, ApiError, MetricsApi};
use crate::domain::{DiscourseRelation, Event, Participant, Relation, Stage};
use crate::persist::SessionStore;
use crate::provenance::{
    diff_discourse, diff_event, diff_participant, diff_relation, EditRecord, EntityKind,
};
use crate::snapshot::AiSnapshot;
use crate::store::PassageStore;

use super::SessionError;

/// The UI-action boundary: every user action lands here, calls the
/// collaborators, applies the result to the store, and reports provenance.
///
/// Collaborator errors are caught here, written into the store's single
/// error field (which forces loading off) and returned to the caller. Local
/// precondition failures are caught before any collaborator call and
/// surfaced the same way. The store itself never throws.
///
/// Execution is single-threaded and event-driven; overlapping requests
/// resolve last-write-wins and there is no cancellation. Timeouts belong to
/// the collaborator implementations.
pub struct AnnotationSession {
    store: PassageStore,
    api: Arc<dyn AnnotationApi>,
    analysis: Arc<dyn AiAnalysis>,
    metrics: Arc<dyn MetricsApi>,
}

impl AnnotationSession {
    pub fn new(
        api: Arc<dyn AnnotationApi>,
        analysis: Arc<dyn AiAnalysis>,
        metrics: Arc<dyn MetricsApi>,
    ) -> Self {
        let store = PassageStore::new().with_metrics(metrics.clone());
        AnnotationSession {
            store,
            api,
            analysis,
            metrics,
        }
    }

    /// Like `new`, but with durable storage attached: the store rehydrates
    /// from it immediately and re-persists after every mutation.
    pub fn with_storage(
        api: Arc<dyn AnnotationApi>,
        analysis: Arc<dyn AiAnalysis>,
        metrics: Arc<dyn MetricsApi>,
        storage: Arc<dyn SessionStore>,
    ) -> Self {
        let store = PassageStore::new()
            .with_metrics(metrics.clone())
            .with_storage(storage);
        AnnotationSession {
            store,
            api,
            analysis,
            metrics,
        }
    }

    pub fn store(&self) -> &PassageStore {
        &self.store
    }

    /// Mutable store access for the renderer's direct actions (validation
    /// toggles, flags). Entity collections still go through the session.
    pub fn store_mut(&mut self) -> &mut PassageStore {
        &mut self.store
    }

    // --- plumbing ---

    fn guard<T>(&mut self, result: Result<T, ApiError>) -> Result<T, SessionError> {
        result.map_err(|err| {
            self.store.set_error(err.to_string());
            SessionError::Api(err)
        })
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        self.store.set_error(err.to_string());
        err
    }

    fn passage_id(&mut self) -> Result<String, SessionError> {
        match self.store.passage() {
            Some(passage) => Ok(passage.id.clone()),
            None => Err(self.fail(SessionError::NoPassage)),
        }
    }

    fn drop_validation(&mut self, stage: Stage, id: &str) {
        if self.store.validated().is_validated(stage, id) {
            self.store.toggle_validation(stage, id);
        }
    }

    // --- passage lifecycle ---

    /// Load a passage and all four entity collections. Always a hard
    /// replace; nothing from a previously loaded passage survives.
    pub fn load_passage(&mut self, passage_id: &str) -> Result<(), SessionError> {
        self.store.set_loading(true);

        let passage = self.guard(self.api.get_passage(passage_id))?;
        let participants = self.guard(self.api.get_participants(passage_id))?;
        let relations = self.guard(self.api.get_relations(passage_id))?;
        let events = self.guard(self.api.get_events(passage_id))?;
        let discourse = self.guard(self.api.get_discourse(passage_id))?;

        self.store.clear_passage();
        self.store.set_passage_data(passage);
        self.store.set_participants(participants);
        self.store.set_relations(relations);
        self.store.set_events(events);
        self.store.set_discourse(discourse);
        self.store.set_loading(false);
        Ok(())
    }

    /// Mark the passage's meaning map complete.
    pub fn finalize(&mut self) -> Result<(), SessionError> {
        let passage_id = self.passage_id()?;
        self.guard(self.api.finalize_passage(&passage_id))
    }

    /// Discard the whole session: store reset plus the persisted record.
    pub fn discard(&mut self) {
        self.store.clear_passage();
    }

    // --- AI analysis ---

    /// Run the two-phase AI analysis. Phase 1 (participants, relations) is
    /// applied before phase 2 (events, discourse) begins, since phase 2
    /// builds on phase 1's output. The combined payload is registered with
    /// the metrics collaborator and captured as the provenance snapshot;
    /// registration failure is telemetry and gets logged, never surfaced.
    pub fn run_ai_analysis(&mut self, context: &str) -> Result<(), SessionError> {
        let (passage_id, reference) = match self.store.passage() {
            Some(passage) => (passage.id.clone(), passage.reference.clone()),
            None => return Err(self.fail(SessionError::NoPassage)),
        };

        self.store.set_loading(true);

        let phase1 = self.guard(self.analysis.phase1(&reference, context))?;
        if let Some(participants) = &phase1.participants {
            self.store.set_participants(participants.clone());
        }
        if let Some(relations) = &phase1.relations {
            self.store.set_relations(relations.clone());
        }

        let phase2 = self.guard(self.analysis.phase2(&reference, context))?;
        if let Some(events) = &phase2.events {
            self.store.set_events(events.clone());
        }
        if let Some(discourse) = &phase2.discourse {
            self.store.set_discourse(discourse.clone());
        }

        let snapshot = AiSnapshot::from_phases(&phase1, &phase2);
        match self.metrics.create_snapshot(&passage_id, &snapshot) {
            Ok(snapshot_id) => self.store.set_ai_snapshot(snapshot, snapshot_id),
            Err(err) => eprintln!("[meaning_map] snapshot registration failed: {}", err),
        }

        self.store.set_loading(false);
        Ok(())
    }

    // --- participants ---

    pub fn create_participant(&mut self, data: Participant) -> Result<Participant, SessionError> {
        let passage_id = self.passage_id()?;
        let created = self.guard(self.api.create_participant(&passage_id, &data))?;

        let record = created.clone();
        self.store.update_participants(|mut list| {
            list.push(record);
            list
        });

        if let Some(id) = &created.id {
            self.store
                .track_edit(EditRecord::create(EntityKind::Participant, id));
        }
        Ok(created)
    }

    pub fn update_participant(
        &mut self,
        id: &str,
        data: Participant,
    ) -> Result<Participant, SessionError> {
        let original = match self
            .store
            .participants()
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned()
        {
            Some(p) => p,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown participant: {}",
                    id
                ))))
            }
        };

        let updated = self.guard(self.api.update_participant(id, &data))?;

        let record = updated.clone();
        self.store.update_participants(|mut list| {
            if let Some(slot) = list.iter_mut().find(|p| p.id.as_deref() == Some(id)) {
                *slot = record;
            }
            list
        });

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_participant(&original))
            .unwrap_or(false);
        for change in diff_participant(&original, &updated) {
            self.store.track_edit(EditRecord::update(
                EntityKind::Participant,
                id,
                change.field,
                change.old,
                change.new,
                ai,
            ));
        }
        Ok(updated)
    }

    pub fn delete_participant(&mut self, id: &str) -> Result<(), SessionError> {
        let original = match self
            .store
            .participants()
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned()
        {
            Some(p) => p,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown participant: {}",
                    id
                ))))
            }
        };

        self.guard(self.api.delete_participant(id))?;

        self.store.update_participants(|mut list| {
            list.retain(|p| p.id.as_deref() != Some(id));
            list
        });
        self.drop_validation(Stage::Participants, id);

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_participant(&original))
            .unwrap_or(false);
        self.store
            .track_edit(EditRecord::delete(EntityKind::Participant, id, ai));
        Ok(())
    }

    // --- relations ---

    pub fn create_relation(&mut self, data: Relation) -> Result<Relation, SessionError> {
        if !data.has_endpoints() {
            return Err(self.fail(SessionError::Precondition(
                "relation needs both a source and a target participant".to_string(),
            )));
        }
        let passage_id = self.passage_id()?;
        let created = self.guard(self.api.create_relation(&passage_id, &data))?;

        let record = created.clone();
        self.store.update_relations(|mut list| {
            list.push(record);
            list
        });

        if let Some(id) = &created.id {
            self.store
                .track_edit(EditRecord::create(EntityKind::Relation, id));
        }
        Ok(created)
    }

    pub fn update_relation(&mut self, id: &str, data: Relation) -> Result<Relation, SessionError> {
        if !data.has_endpoints() {
            return Err(self.fail(SessionError::Precondition(
                "relation needs both a source and a target participant".to_string(),
            )));
        }
        let original = match self
            .store
            .relations()
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned()
        {
            Some(r) => r,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown relation: {}",
                    id
                ))))
            }
        };

        let updated = self.guard(self.api.update_relation(id, &data))?;

        let record = updated.clone();
        self.store.update_relations(|mut list| {
            if let Some(slot) = list.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
                *slot = record;
            }
            list
        });

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_relation(&original))
            .unwrap_or(false);
        for change in diff_relation(&original, &updated) {
            self.store.track_edit(EditRecord::update(
                EntityKind::Relation,
                id,
                change.field,
                change.old,
                change.new,
                ai,
            ));
        }
        Ok(updated)
    }

    pub fn delete_relation(&mut self, id: &str) -> Result<(), SessionError> {
        let original = match self
            .store
            .relations()
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned()
        {
            Some(r) => r,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown relation: {}",
                    id
                ))))
            }
        };

        self.guard(self.api.delete_relation(id))?;

        self.store.update_relations(|mut list| {
            list.retain(|r| r.id.as_deref() != Some(id));
            list
        });
        self.drop_validation(Stage::Relations, id);

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_relation(&original))
            .unwrap_or(false);
        self.store
            .track_edit(EditRecord::delete(EntityKind::Relation, id, ai));
        Ok(())
    }

    // --- events ---

    pub fn create_event(&mut self, data: Event) -> Result<Event, SessionError> {
        let passage_id = self.passage_id()?;
        let created = self.guard(self.api.create_event(&passage_id, &data))?;

        let record = created.clone();
        self.store.update_events(|mut list| {
            list.push(record);
            list
        });

        if let Some(id) = &created.id {
            self.store
                .track_edit(EditRecord::create(EntityKind::Event, id));
        }
        Ok(created)
    }

    pub fn update_event(&mut self, id: &str, data: Event) -> Result<Event, SessionError> {
        let original = match self
            .store
            .events()
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned()
        {
            Some(e) => e,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown event: {}",
                    id
                ))))
            }
        };

        let updated = self.guard(self.api.update_event(id, &data))?;

        let record = updated.clone();
        self.store.update_events(|mut list| {
            if let Some(slot) = list.iter_mut().find(|e| e.id.as_deref() == Some(id)) {
                *slot = record;
            }
            list
        });

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_event(&original))
            .unwrap_or(false);
        for change in diff_event(&original, &updated) {
            self.store.track_edit(EditRecord::update(
                EntityKind::Event,
                id,
                change.field,
                change.old,
                change.new,
                ai,
            ));
        }
        Ok(updated)
    }

    pub fn delete_event(&mut self, id: &str) -> Result<(), SessionError> {
        let original = match self
            .store
            .events()
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned()
        {
            Some(e) => e,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown event: {}",
                    id
                ))))
            }
        };

        self.guard(self.api.delete_event(id))?;

        self.store.update_events(|mut list| {
            list.retain(|e| e.id.as_deref() != Some(id));
            list
        });
        self.drop_validation(Stage::Events, id);

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_event(&original))
            .unwrap_or(false);
        self.store
            .track_edit(EditRecord::delete(EntityKind::Event, id, ai));
        Ok(())
    }

    // --- discourse relations ---

    pub fn create_discourse(
        &mut self,
        data: DiscourseRelation,
    ) -> Result<DiscourseRelation, SessionError> {
        if !data.has_endpoints() {
            return Err(self.fail(SessionError::Precondition(
                "discourse relation needs both a source and a target event".to_string(),
            )));
        }
        let passage_id = self.passage_id()?;
        let created = self.guard(self.api.create_discourse(&passage_id, &data))?;

        let record = created.clone();
        self.store.update_discourse(|mut list| {
            list.push(record);
            list
        });

        if let Some(id) = &created.id {
            self.store
                .track_edit(EditRecord::create(EntityKind::Discourse, id));
        }
        Ok(created)
    }

    pub fn update_discourse(
        &mut self,
        id: &str,
        data: DiscourseRelation,
    ) -> Result<DiscourseRelation, SessionError> {
        if !data.has_endpoints() {
            return Err(self.fail(SessionError::Precondition(
                "discourse relation needs both a source and a target event".to_string(),
            )));
        }
        let original = match self
            .store
            .discourse()
            .iter()
            .find(|d| d.id.as_deref() == Some(id))
            .cloned()
        {
            Some(d) => d,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown discourse relation: {}",
                    id
                ))))
            }
        };

        let updated = self.guard(self.api.update_discourse(id, &data))?;

        let record = updated.clone();
        self.store.update_discourse(|mut list| {
            if let Some(slot) = list.iter_mut().find(|d| d.id.as_deref() == Some(id)) {
                *slot = record;
            }
            list
        });

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_discourse(&original))
            .unwrap_or(false);
        for change in diff_discourse(&original, &updated) {
            self.store.track_edit(EditRecord::update(
                EntityKind::Discourse,
                id,
                change.field,
                change.old,
                change.new,
                ai,
            ));
        }
        Ok(updated)
    }

    pub fn delete_discourse(&mut self, id: &str) -> Result<(), SessionError> {
        let original = match self
            .store
            .discourse()
            .iter()
            .find(|d| d.id.as_deref() == Some(id))
            .cloned()
        {
            Some(d) => d,
            None => {
                return Err(self.fail(SessionError::Precondition(format!(
                    "unknown discourse relation: {}",
                    id
                ))))
            }
        };

        self.guard(self.api.delete_discourse(id))?;

        self.store.update_discourse(|mut list| {
            list.retain(|d| d.id.as_deref() != Some(id));
            list
        });
        self.drop_validation(Stage::Discourse, id);

        let ai = self
            .store
            .ai_snapshot()
            .map(|s| s.contains_discourse(&original))
            .unwrap_or(false);
        self.store
            .track_edit(EditRecord::delete(EntityKind::Discourse, id, ai));
        Ok(())
    }
}
