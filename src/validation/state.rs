use std::collections::HashSet;

use crate::domain::Stage;

/// Per-stage sets of validated record ids.
///
/// Validation is pure set membership: it never reorders or filters the entity
/// collections. Toggling is value-based (present becomes absent and back), and
/// `validate_all` is a full overwrite, never a union.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationState {
    participants: HashSet<String>,
    relations: HashSet<String>,
    events: HashSet<String>,
    discourse: HashSet<String>,
}

impl ValidationState {
    pub fn new() -> Self {
        ValidationState::default()
    }

    fn set(&self, stage: Stage) -> &HashSet<String> {
        match stage {
            Stage::Participants => &self.participants,
            Stage::Relations => &self.relations,
            Stage::Events => &self.events,
            Stage::Discourse => &self.discourse,
        }
    }

    fn set_mut(&mut self, stage: Stage) -> &mut HashSet<String> {
        match stage {
            Stage::Participants => &mut self.participants,
            Stage::Relations => &mut self.relations,
            Stage::Events => &mut self.events,
            Stage::Discourse => &mut self.discourse,
        }
    }

    /// Flip membership of `id` in the stage's validated set. Returns the new
    /// membership, so two toggles always cancel out.
    pub fn toggle(&mut self, stage: Stage, id: impl Into<String>) -> bool {
        let id = id.into();
        let set = self.set_mut(stage);
        if set.remove(&id) {
            false
        } else {
            set.insert(id);
            true
        }
    }

    /// Replace the stage's validated set with exactly `ids`. Ids absent from
    /// `ids` become unvalidated; this is an overwrite, not a union.
    pub fn validate_all<I, S>(&mut self, stage: Stage, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.set_mut(stage) = ids.into_iter().map(Into::into).collect();
    }

    pub fn is_validated(&self, stage: Stage, id: &str) -> bool {
        self.set(stage).contains(id)
    }

    /// True iff every id in `ids` is validated. Vacuously true for an empty
    /// `ids`.
    pub fn is_fully_validated<'a, I>(&self, stage: Stage, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set = self.set(stage);
        ids.into_iter().all(|id| set.contains(id))
    }

    pub fn count(&self, stage: Stage) -> usize {
        self.set(stage).len()
    }

    /// Reset all four validated sets without touching anything else.
    pub fn clear(&mut self) {
        for stage in Stage::ALL {
            self.set_mut(stage).clear();
        }
    }

    /// Stable projection of the stage's set for persistence.
    pub fn ids_sorted(&self, stage: Stage) -> Vec<String> {
        let mut ids: Vec<String> = self.set(stage).iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Rebuild one stage's set from its persisted sequence form.
    pub fn restore<I, S>(&mut self, stage: Stage, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validate_all(stage, ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_parity() {
        let mut v = ValidationState::new();
        // odd number of toggles leaves the id validated, even removes it
        for toggles in 1..=5 {
            let mut state = ValidationState::new();
            for _ in 0..toggles {
                state.toggle(Stage::Participants, "p1");
            }
            assert_eq!(
                state.is_validated(Stage::Participants, "p1"),
                toggles % 2 == 1
            );
        }

        assert!(v.toggle(Stage::Events, "e1"));
        assert!(!v.toggle(Stage::Events, "e1"));
        assert_eq!(v.count(Stage::Events), 0);
    }

    #[test]
    fn validate_all_overwrites() {
        let mut v = ValidationState::new();
        v.validate_all(Stage::Relations, ["r1", "r2", "r3"]);
        assert_eq!(v.count(Stage::Relations), 3);

        v.validate_all(Stage::Relations, ["r2"]);
        assert_eq!(v.count(Stage::Relations), 1);
        assert!(!v.is_validated(Stage::Relations, "r1"));
        assert!(v.is_validated(Stage::Relations, "r2"));
    }

    #[test]
    fn fully_validated_after_validate_all() {
        let mut v = ValidationState::new();
        v.validate_all(Stage::Events, ["e1", "e2"]);
        assert!(v.is_fully_validated(Stage::Events, ["e1", "e2"]));
        assert!(!v.is_fully_validated(Stage::Events, ["e1", "e2", "e3"]));
    }

    #[test]
    fn empty_ids_is_vacuously_validated() {
        let v = ValidationState::new();
        assert!(v.is_fully_validated(Stage::Discourse, []));

        let mut v = ValidationState::new();
        v.toggle(Stage::Discourse, "d9");
        assert!(v.is_fully_validated(Stage::Discourse, []));
    }

    #[test]
    fn validate_all_then_toggle_count() {
        let mut v = ValidationState::new();
        v.validate_all(Stage::Events, ["e1", "e2", "e3"]);
        v.toggle(Stage::Events, "e2");
        assert_eq!(v.count(Stage::Events), 2);
    }

    #[test]
    fn stages_are_independent() {
        let mut v = ValidationState::new();
        v.toggle(Stage::Participants, "x");
        assert_eq!(v.count(Stage::Participants), 1);
        assert_eq!(v.count(Stage::Relations), 0);
        assert!(!v.is_validated(Stage::Events, "x"));
    }

    #[test]
    fn clear_resets_all_stages() {
        let mut v = ValidationState::new();
        for stage in Stage::ALL {
            v.toggle(stage, "id");
        }
        v.clear();
        for stage in Stage::ALL {
            assert_eq!(v.count(stage), 0);
        }
    }

    #[test]
    fn sorted_projection_round_trips() {
        let mut v = ValidationState::new();
        v.validate_all(Stage::Participants, ["b", "a"]);
        assert_eq!(v.ids_sorted(Stage::Participants), vec!["a", "b"]);

        let mut restored = ValidationState::new();
        restored.restore(Stage::Participants, v.ids_sorted(Stage::Participants));
        assert_eq!(restored, v);
    }
}
