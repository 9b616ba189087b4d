//! The error type of the remote resource clients.

use super::transport::TransportError;
use crate::gateway::{ErrorDoc, ErrorKind};
use crate::schema::ValidationErrors;
use thiserror::Error;

/// Failure of a remote call, as seen by the caller.
///
/// Validation failures stay distinct so a form can show them next to its fields; the other
/// variants only ever become a notification.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    #[error(transparent)]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Storage(String),

    /// The call never produced a usable answer: timeout, closed gateway, bad document.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<ErrorDoc> for RemoteError {
    fn from(doc: ErrorDoc) -> Self {
        match doc.kind {
            ErrorKind::Validation => RemoteError::Validation(ValidationErrors(doc.fields)),
            ErrorKind::NotFound => RemoteError::NotFound(doc.detail),
            ErrorKind::Storage => RemoteError::Storage(doc.detail),
            ErrorKind::Transport => RemoteError::Transport(doc.detail),
        }
    }
}

impl From<TransportError> for RemoteError {
    fn from(e: TransportError) -> Self {
        RemoteError::Transport(e.to_string())
    }
}
