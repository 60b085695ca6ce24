//! Training-run errors.

use thiserror::Error;

pub type TrainResult<T> = Result<T, TrainError>;

/// Anything that can end a training run early.
///
/// A step that fails leaves the replay buffer and the best-average
/// bookkeeping consistent; the error aborts the episode and surfaces here.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Env(#[from] rg_env::EnvError),

    #[error(transparent)]
    Learner(#[from] rg_learner::LearnerError),

    #[error(transparent)]
    Replay(#[from] rg_replay::ReplayError),

    #[error(transparent)]
    Config(#[from] rg_core::ConfigError),

    #[error("checkpoint io: {0}")]
    Io(#[from] std::io::Error),

    #[error("stats write: {0}")]
    Csv(#[from] csv::Error),
}
