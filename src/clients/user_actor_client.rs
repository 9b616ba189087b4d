//! # User Actor Client
//!
//! Wraps a `ResourceClient<User>`. Reads come from [`ActorClient`]; `register` is only
//! used to seed the directory.
use crate::model::{User, UserRegistration};
use crate::user_actor::UserError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserActorClient {
    inner: ResourceClient<User>,
}

impl UserActorClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn register(&self, registration: UserRegistration) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.create(registration).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<User> for UserActorClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        UserError::from(e)
    }
}
