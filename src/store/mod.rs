mod store;

pub use store::PassageStore;
