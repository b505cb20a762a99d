mod state;

pub use state::ValidationState;
