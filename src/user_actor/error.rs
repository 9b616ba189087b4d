//! Error types for the User actor.

use actor_framework::{FrameworkError, StorageError};
use thiserror::Error;

/// Errors that can occur during user directory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// A registration is missing a required value.
    #[error("User validation error: {0}")]
    ValidationError(String),

    /// The backing store failed.
    #[error("User storage error: {0}")]
    Storage(StorageError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<UserError>() {
            Ok(entity) => entity,
            Err(FrameworkError::Storage(storage)) => UserError::Storage(storage),
            Err(other) => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}
