//! Error types for the recipe store.

use crate::types::RecipeId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Recipe not found: {0}")]
    NotFound(RecipeId),

    #[error("Invalid recipe: {0}")]
    Validation(String),

    #[error("Failed to read collection {path:?}: {reason}")]
    StorageRead { path: PathBuf, reason: String },

    #[error("Failed to write collection {path:?}: {reason}")]
    StorageWrite { path: PathBuf, reason: String },

    #[error("Collection unavailable at {path:?}: {reason}")]
    StorageUnavailable { path: PathBuf, reason: String },

    #[error("Collection {0:?} is locked by another process")]
    Locked(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::StorageRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::StorageWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::StorageUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error came from the storage layer rather than the caller.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            StoreError::StorageRead { .. }
                | StoreError::StorageWrite { .. }
                | StoreError::StorageUnavailable { .. }
                | StoreError::Locked(_)
                | StoreError::Io(_)
                | StoreError::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
