use std::fmt;

/// Errors surfaced by the external collaborators. Everything collapses to a
/// human-readable message at the session boundary; there is no structured
/// error-code taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout upstream, etc.).
    Network(String),
    /// The collaborator has no record under the given id.
    NotFound { entity: String, id: String },
    /// The collaborator rejected the payload.
    Invalid(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::NotFound { entity, id } => {
                write!(f, "{} not found: {}", entity, id)
            }
            ApiError::Invalid(msg) => write!(f, "invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}
