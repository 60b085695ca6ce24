//! The `Learner` trait — the extension point for policy/value models.

use std::path::Path;

use rg_core::{Action, Observation, Transition};

use crate::error::LearnerResult;

/// Pluggable learner driven by the training loop.
///
/// The loop calls [`predict_action`][Self::predict_action] once per frame,
/// feeds replayed batches to [`train`][Self::train], and manages the
/// exploration schedule through the epsilon methods.  Exploration draws come
/// from state the learner owns, so two learners built from the same seed
/// reproduce the same action sequence regardless of what else the process is
/// doing.
///
/// # Required methods
///
/// Only [`predict_action`][Self::predict_action] is required.  Everything
/// else defaults to the behaviour of a stateless policy: training is a
/// no-op reporting zero loss, there is no target to sync, the exploration
/// rate is fixed, and there is nothing to save.
pub trait Learner: Send {
    /// Pick an action for `state`, exploration included.
    fn predict_action(&mut self, state: &Observation) -> Action;

    /// Learn from a batch of transitions, returning the mean loss.
    fn train(&mut self, _batch: &[Transition]) -> LearnerResult<f32> {
        Ok(0.0)
    }

    /// Copy the online parameters into the frozen target.
    fn update_target(&mut self) {}

    /// Current exploration rate.
    fn epsilon(&self) -> f32 {
        0.0
    }

    /// Overwrite the exploration rate (the loop's re-exploration kick).
    fn set_epsilon(&mut self, _epsilon: f32) {}

    /// One schedule step.
    fn decay_epsilon(&mut self) {}

    /// True when the schedule has bottomed out at its floor.  The loop keys
    /// its re-exploration kick off this.
    fn at_floor(&self) -> bool {
        false
    }

    /// Persist learner state to `path`.
    fn save(&self, _path: &Path) -> LearnerResult<()> {
        Ok(())
    }
}
