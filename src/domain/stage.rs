use std::fmt;

use serde::{Deserialize, Serialize};

/// The four reviewable entity collections of a passage session.
///
/// Each stage owns one entity collection and one validated-id set. The UI
/// walks them in order, but nothing in the store depends on that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Participants,
    Relations,
    Events,
    Discourse,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Participants,
        Stage::Relations,
        Stage::Events,
        Stage::Discourse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Participants => "participants",
            Stage::Relations => "relations",
            Stage::Events => "events",
            Stage::Discourse => "discourse",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
