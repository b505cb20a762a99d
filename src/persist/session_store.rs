use std::fmt;

/// Error type for durable-storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backend-level failure (quota, lock, I/O).
    Backend(String),
    /// The stored record could not be encoded or decoded.
    Codec(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend(msg) => write!(f, "storage error: {}", msg),
            StorageError::Codec(msg) => write!(f, "storage codec error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Durable storage of named string records.
///
/// The session persists as a single named record; the value is an opaque
/// string from the backend's point of view. Mirrors the string-valued
/// key/value storage the client platform provides.
pub trait SessionStore: Send + Sync {
    /// Load a record by name. Returns None if it was never written.
    fn get(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Write (or overwrite) a record.
    fn put(&self, name: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a record. Returns true if one existed.
    fn remove(&self, name: &str) -> Result<bool, StorageError>;
}
