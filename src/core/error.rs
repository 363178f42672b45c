use thiserror::Error;

#[derive(Error, Debug)]
pub enum CivitasError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::core::types::EntityId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CivitasError>;
