use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("could not encode or decode {path}: {source}")]
    Encoding {
        path: String,
        source: bincode::Error,
    },
}

pub trait Save {
    fn save(&self, path: &str) -> Result<(), PersistenceError>;
}

impl<T> Save for T
where
    T: Serialize,
{
    fn save(&self, path: &str) -> Result<(), PersistenceError> {
        let file = File::create(path).map_err(|source| PersistenceError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut file = BufWriter::new(file);
        bincode::serialize_into(&mut file, &self).map_err(|source| PersistenceError::Encoding {
            path: path.to_string(),
            source,
        })
    }
}

pub trait Load: Sized {
    fn load(path: &str) -> Result<Self, PersistenceError>;
}

impl<T> Load for T
where
    T: DeserializeOwned,
{
    fn load(path: &str) -> Result<Self, PersistenceError> {
        let file = File::open(path).map_err(|source| PersistenceError::Io {
            path: path.to_string(),
            source,
        })?;
        bincode::deserialize_from(BufReader::new(file)).map_err(|source| {
            PersistenceError::Encoding {
                path: path.to_string(),
                source,
            }
        })
    }
}
