use commons::persistence::PersistenceError;
use pioneer::{FieldError, MeshError};
use futures::task::SpawnError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("could not build mesh: {0}")]
    Mesh(#[from] MeshError),
    #[error("could not compute terrain: {0}")]
    Field(#[from] FieldError),
    #[error("invalid value {value} for {name}")]
    InvalidParameter { name: &'static str, value: String },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("could not export {path}: {source}")]
    Export {
        path: String,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    Output { path: String, source: io::Error },
    #[error("could not start worker threads: {0}")]
    Workers(io::Error),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

impl GenerationError {
    pub fn invalid<T: ToString>(name: &'static str, value: T) -> GenerationError {
        GenerationError::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}
