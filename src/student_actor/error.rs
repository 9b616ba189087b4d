//! Error types for the Student actor.

use crate::schema::ValidationErrors;
use actor_framework::{FrameworkError, StorageError};
use thiserror::Error;

/// Errors that can occur during student operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StudentError {
    /// The candidate record violates the schema. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// No student is stored under the given id.
    #[error("Student not found: {0}")]
    NotFound(String),

    /// The backing store rejected the write. Nothing was written.
    #[error("Student storage error: {0}")]
    Storage(StorageError),

    /// The actor is gone or dropped the request.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for StudentError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<StudentError>() {
            Ok(entity) => entity,
            Err(FrameworkError::NotFound(id)) => StudentError::NotFound(id),
            Err(FrameworkError::Storage(storage)) => StudentError::Storage(storage),
            Err(other) => StudentError::ActorCommunicationError(other.to_string()),
        }
    }
}
