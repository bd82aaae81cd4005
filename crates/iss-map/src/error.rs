//! Error types for matching operations.

use iss_model::ModelError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("acceptance threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("a mapping session is already active")]
    SessionExists,
    #[error("no active mapping session")]
    NoSession,
    #[error("mapping session lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, MapError>;
