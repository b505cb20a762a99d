use std::fmt;

use crate::api::ApiError;

/// Errors surfaced at the UI-action boundary. Whatever the variant, the
/// session has already written the message into the store's error field, so
/// the renderer never needs to inspect this beyond logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A collaborator call failed.
    Api(ApiError),
    /// A local precondition failed before any collaborator call was made.
    Precondition(String),
    /// The action needs an active passage and none is loaded.
    NoPassage,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Api(err) => err.fmt(f),
            SessionError::Precondition(msg) => f.write_str(msg),
            SessionError::NoPassage => f.write_str("no passage loaded"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        SessionError::Api(err)
    }
}
