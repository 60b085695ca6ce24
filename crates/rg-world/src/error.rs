use thiserror::Error;

use rg_core::BodyId;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("body {0} does not exist")]
    UnknownBody(BodyId),

    #[error("body {0} is not a dynamic agent and cannot be steered")]
    NotSteerable(BodyId),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("cannot attach {child} to {parent}")]
    InvalidAttachment { parent: BodyId, child: BodyId },
}

pub type WorldResult<T> = Result<T, WorldError>;
