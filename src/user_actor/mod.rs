//! # User Actor
//!
//! Holds the directory of registered users. The gateway only ever enumerates it; new
//! users enter through [`UserActorClient::register`](crate::clients::UserActorClient::register)
//! when the directory is seeded, or from a users snapshot file.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`User`]
//! - [`error`] - [`UserError`] type for type-safe error handling
//! - [`new()`] / [`with_persistence()`] - Factory functions that create the actor and client

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserActorClient;
use crate::model::User;
use actor_framework::{Persistence, ResourceActor, StorageError};

/// Creates an empty in-memory User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserActorClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, UserActorClient::new(generic_client))
}

/// Creates a User actor backed by `persistence`, e.g. a users snapshot file.
pub fn with_persistence(
    buffer_size: usize,
    persistence: impl Persistence<User>,
) -> Result<(ResourceActor<User>, UserActorClient), StorageError> {
    let (actor, generic_client) = ResourceActor::with_persistence(buffer_size, persistence)?;
    Ok((actor, UserActorClient::new(generic_client)))
}
