//! In-memory collaborators for tests and development.
//!
//! Same shape as the real REST collaborators, backed by HashMaps. Storage
//! keys records per passage; update/delete look a record up by its
//! server-assigned id across passages, the way the REST routes do.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::{DiscourseRelation, Event, Participant, Passage, Relation};
use crate::provenance::EditRecord;
use crate::snapshot::{AiSnapshot, Phase1Result, Phase2Result};

use super::{AiAnalysis, AnnotationApi, ApiError, MetricsApi};

/// Record stored by the in-memory annotation collaborator.
trait Record: Clone {
    const NAME: &'static str;
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
}

impl Record for Participant {
    const NAME: &'static str = "participant";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl Record for Relation {
    const NAME: &'static str = "relation";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl Record for Event {
    const NAME: &'static str = "event";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl Record for DiscourseRelation {
    const NAME: &'static str = "discourse";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

#[derive(Default)]
struct Inner {
    passages: HashMap<String, Passage>,
    participants: HashMap<String, Vec<Participant>>,
    relations: HashMap<String, Vec<Relation>>,
    events: HashMap<String, Vec<Event>>,
    discourse: HashMap<String, Vec<DiscourseRelation>>,
    finalized: HashSet<String>,
    next_id: u64,
}

fn create_in<T: Record>(
    collections: &mut HashMap<String, Vec<T>>,
    next_id: &mut u64,
    passage_id: &str,
    data: &T,
) -> T {
    *next_id += 1;
    let mut record = data.clone();
    record.set_id(format!("srv-{}", next_id));
    collections
        .entry(passage_id.to_string())
        .or_default()
        .push(record.clone());
    record
}

fn update_in<T: Record>(
    collections: &mut HashMap<String, Vec<T>>,
    id: &str,
    data: &T,
) -> Result<T, ApiError> {
    for list in collections.values_mut() {
        if let Some(slot) = list.iter_mut().find(|r| r.id() == Some(id)) {
            let mut record = data.clone();
            record.set_id(id.to_string());
            *slot = record.clone();
            return Ok(record);
        }
    }
    Err(ApiError::not_found(T::NAME, id))
}

fn delete_in<T: Record>(
    collections: &mut HashMap<String, Vec<T>>,
    id: &str,
) -> Result<(), ApiError> {
    for list in collections.values_mut() {
        let before = list.len();
        list.retain(|r| r.id() != Some(id));
        if list.len() < before {
            return Ok(());
        }
    }
    Err(ApiError::not_found(T::NAME, id))
}

/// HashMap-backed annotation collaborator. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryAnnotationApi {
    inner: Arc<RwLock<Inner>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryAnnotationApi {
    pub fn new() -> Self {
        InMemoryAnnotationApi::default()
    }

    /// Seed a passage for tests.
    pub fn insert_passage(&self, passage: Passage) {
        if let Ok(mut inner) = self.inner.write() {
            inner.passages.insert(passage.id.clone(), passage);
        }
    }

    /// When set, every call fails with a network error until cleared.
    pub fn fail_requests(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    pub fn is_finalized(&self, passage_id: &str) -> bool {
        self.inner
            .read()
            .map(|inner| inner.finalized.contains(passage_id))
            .unwrap_or(false)
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ApiError::Network("connection reset".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, ApiError> {
        self.inner
            .read()
            .map_err(|_| ApiError::Network("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, ApiError> {
        self.inner
            .write()
            .map_err(|_| ApiError::Network("lock poisoned".to_string()))
    }
}

impl AnnotationApi for InMemoryAnnotationApi {
    fn get_passage(&self, passage_id: &str) -> Result<Passage, ApiError> {
        self.check()?;
        self.read()?
            .passages
            .get(passage_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("passage", passage_id))
    }

    fn finalize_passage(&self, passage_id: &str) -> Result<(), ApiError> {
        self.check()?;
        let mut inner = self.write()?;
        if !inner.passages.contains_key(passage_id) {
            return Err(ApiError::not_found("passage", passage_id));
        }
        inner.finalized.insert(passage_id.to_string());
        Ok(())
    }

    fn get_participants(&self, passage_id: &str) -> Result<Vec<Participant>, ApiError> {
        self.check()?;
        Ok(self.read()?.participants.get(passage_id).cloned().unwrap_or_default())
    }

    fn create_participant(
        &self,
        passage_id: &str,
        data: &Participant,
    ) -> Result<Participant, ApiError> {
        self.check()?;
        let mut inner = self.write()?;
        let inner = &mut *inner;
        Ok(create_in(&mut inner.participants, &mut inner.next_id, passage_id, data))
    }

    fn update_participant(&self, id: &str, data: &Participant) -> Result<Participant, ApiError> {
        self.check()?;
        update_in(&mut self.write()?.participants, id, data)
    }

    fn delete_participant(&self, id: &str) -> Result<(), ApiError> {
        self.check()?;
        delete_in(&mut self.write()?.participants, id)
    }

    fn get_relations(&self, passage_id: &str) -> Result<Vec<Relation>, ApiError> {
        self.check()?;
        Ok(self.read()?.relations.get(passage_id).cloned().unwrap_or_default())
    }

    fn create_relation(&self, passage_id: &str, data: &Relation) -> Result<Relation, ApiError> {
        self.check()?;
        let mut inner = self.write()?;
        let inner = &mut *inner;
        Ok(create_in(&mut inner.relations, &mut inner.next_id, passage_id, data))
    }

    fn update_relation(&self, id: &str, data: &Relation) -> Result<Relation, ApiError> {
        self.check()?;
        update_in(&mut self.write()?.relations, id, data)
    }

    fn delete_relation(&self, id: &str) -> Result<(), ApiError> {
        self.check()?;
        delete_in(&mut self.write()?.relations, id)
    }

    fn get_events(&self, passage_id: &str) -> Result<Vec<Event>, ApiError> {
        self.check()?;
        Ok(self.read()?.events.get(passage_id).cloned().unwrap_or_default())
    }

    fn create_event(&self, passage_id: &str, data: &Event) -> Result<Event, ApiError> {
        self.check()?;
        let mut inner = self.write()?;
        let inner = &mut *inner;
        Ok(create_in(&mut inner.events, &mut inner.next_id, passage_id, data))
    }

    fn update_event(&self, id: &str, data: &Event) -> Result<Event, ApiError> {
        self.check()?;
        update_in(&mut self.write()?.events, id, data)
    }

    fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.check()?;
        delete_in(&mut self.write()?.events, id)
    }

    fn get_discourse(&self, passage_id: &str) -> Result<Vec<DiscourseRelation>, ApiError> {
        self.check()?;
        Ok(self.read()?.discourse.get(passage_id).cloned().unwrap_or_default())
    }

    fn create_discourse(
        &self,
        passage_id: &str,
        data: &DiscourseRelation,
    ) -> Result<DiscourseRelation, ApiError> {
        self.check()?;
        let mut inner = self.write()?;
        let inner = &mut *inner;
        Ok(create_in(&mut inner.discourse, &mut inner.next_id, passage_id, data))
    }

    fn update_discourse(
        &self,
        id: &str,
        data: &DiscourseRelation,
    ) -> Result<DiscourseRelation, ApiError> {
        self.check()?;
        update_in(&mut self.write()?.discourse, id, data)
    }

    fn delete_discourse(&self, id: &str) -> Result<(), ApiError> {
        self.check()?;
        delete_in(&mut self.write()?.discourse, id)
    }
}

/// Metrics collaborator that records everything it is sent.
#[derive(Clone, Default)]
pub struct RecordingMetrics {
    edits: Arc<Mutex<Vec<(String, EditRecord)>>>,
    snapshots: Arc<Mutex<Vec<(String, AiSnapshot)>>>,
    next_id: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        RecordingMetrics::default()
    }

    /// When set, both calls fail with a network error until cleared.
    pub fn fail_requests(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    pub fn edits(&self) -> Vec<EditRecord> {
        self.edits
            .lock()
            .map(|edits| edits.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default()
    }

    /// Edits paired with the snapshot id they were logged under.
    pub fn scoped_edits(&self) -> Vec<(String, EditRecord)> {
        self.edits.lock().map(|edits| edits.clone()).unwrap_or_default()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ApiError::Network("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

impl MetricsApi for RecordingMetrics {
    fn create_snapshot(&self, passage_id: &str, payload: &AiSnapshot) -> Result<String, ApiError> {
        self.check()?;
        let id = format!("snap-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.snapshots
            .lock()
            .map_err(|_| ApiError::Network("lock poisoned".to_string()))?
            .push((passage_id.to_string(), payload.clone()));
        Ok(id)
    }

    fn log_edit(&self, snapshot_id: &str, record: &EditRecord) -> Result<(), ApiError> {
        self.check()?;
        self.edits
            .lock()
            .map_err(|_| ApiError::Network("lock poisoned".to_string()))?
            .push((snapshot_id.to_string(), record.clone()));
        Ok(())
    }
}

/// Analysis collaborator replaying fixed phase payloads.
#[derive(Clone, Default)]
pub struct ScriptedAnalysis {
    phase1: Phase1Result,
    phase2: Phase2Result,
    failing: Arc<AtomicBool>,
}

impl ScriptedAnalysis {
    pub fn new(phase1: Phase1Result, phase2: Phase2Result) -> Self {
        ScriptedAnalysis {
            phase1,
            phase2,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// When set, both phases fail with a network error until cleared.
    pub fn fail_requests(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ApiError::Network("analysis unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl AiAnalysis for ScriptedAnalysis {
    fn phase1(&self, _reference: &str, _context: &str) -> Result<Phase1Result, ApiError> {
        self.check()?;
        Ok(self.phase1.clone())
    }

    fn phase2(&self, _reference: &str, _context: &str) -> Result<Phase2Result, ApiError> {
        self.check()?;
        Ok(self.phase2.clone())
    }
}
