use thiserror::Error;

pub type AdallocResult<T> = Result<T, AdallocError>;

#[derive(Error, Debug)]
pub enum AdallocError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AdallocError {
    fn from(e: config::ConfigError) -> Self {
        AdallocError::Config(e.to_string())
    }
}
