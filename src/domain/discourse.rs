use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed vocabulary of inter-event discourse relations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscourseRelationType {
    Sequence,
    Cause,
    Result,
    Purpose,
    Condition,
    Concession,
    Contrast,
    Explanation,
    Elaboration,
    Background,
    Setting,
    Simultaneous,
}

impl DiscourseRelationType {
    pub const ALL: [DiscourseRelationType; 12] = [
        DiscourseRelationType::Sequence,
        DiscourseRelationType::Cause,
        DiscourseRelationType::Result,
        DiscourseRelationType::Purpose,
        DiscourseRelationType::Condition,
        DiscourseRelationType::Concession,
        DiscourseRelationType::Contrast,
        DiscourseRelationType::Explanation,
        DiscourseRelationType::Elaboration,
        DiscourseRelationType::Background,
        DiscourseRelationType::Setting,
        DiscourseRelationType::Simultaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscourseRelationType::Sequence => "sequence",
            DiscourseRelationType::Cause => "cause",
            DiscourseRelationType::Result => "result",
            DiscourseRelationType::Purpose => "purpose",
            DiscourseRelationType::Condition => "condition",
            DiscourseRelationType::Concession => "concession",
            DiscourseRelationType::Contrast => "contrast",
            DiscourseRelationType::Explanation => "explanation",
            DiscourseRelationType::Elaboration => "elaboration",
            DiscourseRelationType::Background => "background",
            DiscourseRelationType::Setting => "setting",
            DiscourseRelationType::Simultaneous => "simultaneous",
        }
    }
}

impl fmt::Display for DiscourseRelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscourseRelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiscourseRelationType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown discourse relation type: {}", s))
    }
}

/// A directed discourse relation between two events. `source` and `target`
/// are event references (short codes, or server ids once persisted).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscourseRelation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub relation_type: DiscourseRelationType,
    pub source: String,
    pub target: String,
}

impl DiscourseRelation {
    pub fn new(
        relation_type: DiscourseRelationType,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        DiscourseRelation {
            id: None,
            relation_type,
            source: source.into(),
            target: target.into(),
        }
    }

    /// True when both event endpoints are filled in.
    pub fn has_endpoints(&self) -> bool {
        !self.source.is_empty() && !self.target.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_round_trips_through_names() {
        for t in DiscourseRelationType::ALL {
            let parsed: DiscourseRelationType = t.as_str().parse().unwrap();
            assert_eq!(parsed, t);
        }
        assert!("flashback".parse::<DiscourseRelationType>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let d = DiscourseRelation::new(DiscourseRelationType::Cause, "e1", "e2");
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"relation_type\":\"cause\""));
    }

    #[test]
    fn endpoints_required() {
        let d = DiscourseRelation::new(DiscourseRelationType::Sequence, "e1", "");
        assert!(!d.has_endpoints());
    }
}
