mod error;
mod session;

pub use error::SessionError;
pub use session::AnnotationSession;
