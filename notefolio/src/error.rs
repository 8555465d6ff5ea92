//! Error types for Notefolio
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to a UI host.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Validation failures are user mistakes, everything else is a store failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Rejected input. Raised before anything is written to the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A note needs a title before it can be saved")]
    BlankTitle,

    #[error("Save \"{0}\" before adding it to favorites")]
    NoteNotSaved(String),

    #[error("A folder needs a name")]
    BlankFolderName,

    #[error("\"{0}\" is a reserved folder name")]
    ReservedFolderName(String),

    #[error("\"{0}\" is not in the trash")]
    NotInTrash(String),

    #[error("Notes cannot be moved to \"{0}\"")]
    InvalidDestination(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
