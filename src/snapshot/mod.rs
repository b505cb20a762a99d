mod snapshot;

pub use snapshot::{AiSnapshot, Phase1Result, Phase2Result};
