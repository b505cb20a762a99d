//! Trait seams for the external collaborators: the annotation REST API, the
//! AI analysis service, and the metrics collector. The store and session
//! depend only on these traits; in-memory implementations back the tests.

mod analysis;
mod annotation;
mod error;
mod in_memory;
mod metrics;

pub use analysis::AiAnalysis;
pub use annotation::AnnotationApi;
pub use error::ApiError;
pub use in_memory::{InMemoryAnnotationApi, RecordingMetrics, ScriptedAnalysis};
pub use metrics::MetricsApi;
