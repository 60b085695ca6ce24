use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene parse error: {0}")]
    Parse(String),

    #[error("scene must contain exactly one agent, found {found}")]
    AgentCount { found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;
