use serde::{Deserialize, Serialize};

/// One descriptive property of a participant (dimension, value, optional
/// degree), e.g. `("social_status", "king", Some("high"))`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub dimension: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
}

/// A discourse participant identified in the passage.
///
/// `id` is server-assigned and absent until the record has been persisted;
/// `code` is the user-facing short handle (`p1`, `p2`, ...). Codes are unique
/// within a passage by convention only; nothing here enforces it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: String,
    pub hebrew: String,
    pub gloss: String,
    pub participant_type: String,
    pub quantity: String,
    pub reference_status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

impl Participant {
    pub fn new(code: impl Into<String>, hebrew: impl Into<String>, gloss: impl Into<String>) -> Self {
        Participant {
            id: None,
            code: code.into(),
            hebrew: hebrew.into(),
            gloss: gloss.into(),
            participant_type: String::new(),
            quantity: String::new(),
            reference_status: String::new(),
            properties: Vec::new(),
        }
    }
}
