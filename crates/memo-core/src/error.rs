//! Error types for memo-core

use thiserror::Error;

use crate::models::NoteId;

/// Result type alias using memo-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in memo-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Failure reported by the note service
    #[error("Service error: {0}")]
    Service(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// The note was never persisted, so there is nothing to delete
    #[error("Note has no identifier")]
    MissingId,
}
