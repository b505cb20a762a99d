//! Durable persistence of the session across reloads.

mod in_memory;
mod persisted;
mod session_store;

pub use in_memory::InMemorySessionStore;
pub use persisted::{PersistedSession, PersistedValidation, SESSION_RECORD};
pub use session_store::{SessionStore, StorageError};
