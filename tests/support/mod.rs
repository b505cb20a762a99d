#![allow(dead_code)]

use meaning_map::{
    AnnotationApi, Clause, DiscourseRelation, DiscourseRelationType, Event, InMemoryAnnotationApi,
    Participant, Passage, Phase1Result, Phase2Result, RecordingMetrics, Relation, Role,
    ScriptedAnalysis,
};

pub const PASSAGE_ID: &str = "ps-gen-1-1";

pub fn fixture_passage() -> Passage {
    Passage {
        id: PASSAGE_ID.to_string(),
        reference: "Genesis 1:1".to_string(),
        source_language: "hbo".to_string(),
        clauses: vec![
            Clause {
                id: "c1".to_string(),
                position: 1,
                verse: 1,
                text: "בְּרֵאשִׁית בָּרָא אֱלֹהִים".to_string(),
                gloss: "in the beginning God created".to_string(),
                clause_type: "x-qatal".to_string(),
                mainline: true,
                lemma: Some("ברא".to_string()),
                binyan: Some("qal".to_string()),
                tense: Some("perfect".to_string()),
                roles: vec!["agent".to_string(), "patient".to_string()],
            },
            Clause {
                id: "c2".to_string(),
                position: 2,
                verse: 1,
                text: "אֵת הַשָּׁמַיִם וְאֵת הָאָרֶץ".to_string(),
                gloss: "the heavens and the earth".to_string(),
                clause_type: "fragment".to_string(),
                mainline: false,
                lemma: None,
                binyan: None,
                tense: None,
                roles: Vec::new(),
            },
        ],
        display_units: None,
    }
}

/// A wired collaborator set: passage seeded, AI records persisted through the
/// annotation API, and the analysis scripted to return those same records:
/// the shape a real two-phase run leaves behind.
pub struct Fixture {
    pub api: InMemoryAnnotationApi,
    pub metrics: RecordingMetrics,
    pub analysis: ScriptedAnalysis,
}

pub fn ai_fixture() -> Fixture {
    let api = InMemoryAnnotationApi::new();
    api.insert_passage(fixture_passage());

    let god = api
        .create_participant(PASSAGE_ID, &Participant::new("p1", "אֱלֹהִים", "God"))
        .unwrap();
    let earth = api
        .create_participant(PASSAGE_ID, &Participant::new("p2", "הָאָרֶץ", "the earth"))
        .unwrap();

    let relation = api
        .create_relation(
            PASSAGE_ID,
            &Relation::new("creation", "creator of", "p1", "p2"),
        )
        .unwrap();

    let mut create = Event::new("e1", "action", "create");
    create.clause_id = Some("c1".to_string());
    create.roles.push(Role {
        label: "agent".to_string(),
        participant: Some("p1".to_string()),
    });
    create.roles.push(Role {
        label: "patient".to_string(),
        participant: Some("p2".to_string()),
    });
    let mut formless = Event::new("e2", "state", "be formless");
    formless.clause_id = Some("c2".to_string());
    let create = api.create_event(PASSAGE_ID, &create).unwrap();
    let formless = api.create_event(PASSAGE_ID, &formless).unwrap();

    let sequence = api
        .create_discourse(
            PASSAGE_ID,
            &DiscourseRelation::new(DiscourseRelationType::Sequence, "e1", "e2"),
        )
        .unwrap();

    let analysis = ScriptedAnalysis::new(
        Phase1Result {
            participants: Some(vec![god, earth]),
            relations: Some(vec![relation]),
        },
        Phase2Result {
            events: Some(vec![create, formless]),
            discourse: Some(vec![sequence]),
        },
    );

    Fixture {
        api,
        metrics: RecordingMetrics::new(),
        analysis,
    }
}

/// Collaborators with a seeded passage and no AI involvement.
pub fn human_fixture() -> Fixture {
    let api = InMemoryAnnotationApi::new();
    api.insert_passage(fixture_passage());
    Fixture {
        api,
        metrics: RecordingMetrics::new(),
        analysis: ScriptedAnalysis::default(),
    }
}
