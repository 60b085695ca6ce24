//! `rg-learner` — the learner seam and the shipped reference learners.
//!
//! | Module    | Contents                                           |
//! |-----------|----------------------------------------------------|
//! | `learner` | The [`Learner`] trait the training loop drives     |
//! | `epsilon` | [`EpsilonGreedy`] exploration schedule             |
//! | `linear`  | [`LinearQLearner`]: per-action linear Q + target   |
//! | `random`  | [`RandomPolicy`] baseline                          |
//! | `error`   | [`LearnerError`], [`LearnerResult`]                |
//!
//! Heavier function approximators live behind the same trait; the shipped
//! linear learner keeps the loop honest end to end (prediction, TD batches,
//! target syncs, JSON checkpoints) without pulling in a tensor stack.

mod epsilon;
mod error;
mod learner;
mod linear;
mod random;

pub use epsilon::EpsilonGreedy;
pub use error::{LearnerError, LearnerResult};
pub use learner::Learner;
pub use linear::{LinearConfig, LinearQLearner};
pub use random::RandomPolicy;

#[cfg(test)]
mod tests;
