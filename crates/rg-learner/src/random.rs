//! A policy that explores forever.

use rg_core::{Action, Observation, RunRng};

use crate::learner::Learner;

/// Baseline [`Learner`]: uniform random actions, no learning.
///
/// Useful for smoke-testing a harness before plugging in a real learner and
/// as the floor to compare learned policies against.
pub struct RandomPolicy {
    rng: RunRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self { rng: RunRng::new(seed) }
    }

    pub fn with_rng(rng: RunRng) -> Self {
        Self { rng }
    }
}

impl Learner for RandomPolicy {
    fn predict_action(&mut self, _state: &Observation) -> Action {
        self.rng.choose(&Action::ALL).copied().unwrap_or(Action::Forward)
    }

    /// Always fully exploratory.
    fn epsilon(&self) -> f32 {
        1.0
    }
}
