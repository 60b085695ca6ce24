//! Environment-level errors.

use thiserror::Error;

pub type EnvResult<T> = Result<T, EnvError>;

/// Anything that can go wrong while building or driving an
/// [`Environment`](crate::Environment).
#[derive(Debug, Error)]
pub enum EnvError {
    /// A numeric action index outside the action alphabet reached
    /// [`step_index`](crate::Environment::step_index).
    #[error("action index {0} is outside the action alphabet")]
    InvalidAction(usize),

    #[error(transparent)]
    Scene(#[from] rg_scene::SceneError),

    #[error(transparent)]
    Sensor(#[from] rg_sensor::SensorError),

    #[error(transparent)]
    World(#[from] rg_world::WorldError),

    #[error(transparent)]
    Config(#[from] rg_core::ConfigError),
}
