use crate::error::{LifecycleError, LifecycleResult};
use crate::models::record::RecordId;

use super::types::Stage;

impl Stage {
    /// Check whether a record may move from this stage to `target`.
    ///
    /// Valid transitions are one step forward, plus `Review` -> `Building`
    /// for rework. Staying put and skipping stages are both rejected.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        self.next() == Some(target) || (*self == Stage::Review && target == Stage::Building)
    }

    /// Returns the stages this stage can transition to.
    pub fn valid_transitions(&self) -> Vec<Stage> {
        match self {
            Stage::Ready => vec![Stage::Testing],
            Stage::Testing => vec![Stage::Building],
            Stage::Building => vec![Stage::Review],
            Stage::Review => vec![Stage::Completed, Stage::Building],
            Stage::Completed => vec![], // Terminal
        }
    }

    /// Validate a transition for `id`, returning the target on success.
    pub fn try_transition(&self, id: RecordId, target: Stage) -> LifecycleResult<Stage> {
        if self.can_transition_to(target) {
            return Ok(target);
        }

        let allowed = self.valid_transitions();
        let allowed = if allowed.is_empty() {
            "nothing (terminal stage)".to_string()
        } else {
            allowed
                .iter()
                .map(Stage::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        Err(LifecycleError::InvalidTransition {
            id,
            from: *self,
            to: target,
            allowed,
        })
    }
}
