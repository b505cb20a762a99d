//! Domain records for a passage annotation session.
//!
//! These are plain serde-backed data types; all consistency rules live in
//! the store and session layers.

mod discourse;
mod event;
mod participant;
mod passage;
mod relation;
mod stage;

pub use discourse::{DiscourseRelation, DiscourseRelationType};
pub use event::{Event, Role};
pub use participant::{Participant, Property};
pub use passage::{Clause, DisplayUnit, Passage};
pub use relation::Relation;
pub use stage::Stage;
