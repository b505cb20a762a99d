use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One clause from the linguistic dataset. Immutable once loaded; the
/// morphological fields are present only when the dataset supplies them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub id: String,
    pub position: u32,
    pub verse: u32,
    pub text: String,
    pub gloss: String,
    pub clause_type: String,
    /// True for mainline clauses, false for background material.
    pub mainline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binyan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tense: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// A run of clause ids shown as one card. The AI layer may merge adjacent
/// clauses for readability; `merged` marks those units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayUnit {
    pub clause_ids: Vec<String>,
    #[serde(default)]
    pub merged: bool,
}

impl DisplayUnit {
    pub fn single(clause_id: impl Into<String>) -> Self {
        DisplayUnit {
            clause_ids: vec![clause_id.into()],
            merged: false,
        }
    }
}

/// The passage under annotation: an ordered clause sequence plus optional
/// display-unit grouping. Replaced wholesale on load, cleared on discard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub reference: String,
    pub source_language: String,
    pub clauses: Vec<Clause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_units: Option<Vec<DisplayUnit>>,
}

impl Passage {
    /// Display units for rendering. Falls back to one unit per clause when
    /// no grouping was supplied.
    pub fn display_units(&self) -> Vec<DisplayUnit> {
        match &self.display_units {
            Some(units) => units.clone(),
            None => self
                .clauses
                .iter()
                .map(|clause| DisplayUnit::single(clause.id.clone()))
                .collect(),
        }
    }

    /// True when the configured display units cover every clause id exactly
    /// once. Vacuously true when no grouping was supplied.
    pub fn display_units_partition_clauses(&self) -> bool {
        let Some(units) = &self.display_units else {
            return true;
        };

        let mut seen = HashSet::new();
        for unit in units {
            for clause_id in &unit.clause_ids {
                if !seen.insert(clause_id.as_str()) {
                    return false;
                }
            }
        }
        seen.len() == self.clauses.len()
            && self.clauses.iter().all(|c| seen.contains(c.id.as_str()))
    }
}
