//! Storage errors.

use crate::types::Column;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Insert refused by a uniqueness constraint.
    #[error("Duplicate value for unique column {0}")]
    Conflict(Column),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}
