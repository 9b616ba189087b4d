//! # Student Actor Client
//!
//! Provides a high‑level API for interacting with the `Student` actor.
//! It wraps a `ResourceClient<Student>` and exposes domain‑specific methods.
use crate::model::{Student, StudentId, StudentInput};
use crate::student_actor::StudentError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Student actor.
#[derive(Clone)]
pub struct StudentActorClient {
    inner: ResourceClient<Student>,
}

impl StudentActorClient {
    pub fn new(inner: ResourceClient<Student>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Student> for StudentActorClient {
    type Error = StudentError;

    fn inner(&self) -> &ResourceClient<Student> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        StudentError::from(e)
    }
}

impl StudentActorClient {
    #[instrument(skip(self))]
    pub async fn create_student(&self, input: StudentInput) -> Result<Student, StudentError> {
        debug!("Sending request");
        self.inner.create(input).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_student(
        &self,
        id: StudentId,
        input: StudentInput,
    ) -> Result<Student, StudentError> {
        debug!("Sending request");
        self.inner.update(id, input).await.map_err(Self::map_error)
    }
}
