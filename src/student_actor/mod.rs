//! # Student Actor
//!
//! The persistence gateway for Student records: a [`ResourceActor`] whose entity hooks
//! enforce the schema and stamp timestamps.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Student`]
//! - [`error`] - [`StudentError`] type for type-safe error handling
//! - [`new()`] / [`with_persistence()`] - Factory functions that create the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use student_records::context::RecordsContext;
//! use student_records::model::{Gender, StudentInput};
//! use student_records::student_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = student_actor::new(32);
//!     tokio::spawn(actor.run(RecordsContext::system()));
//!
//!     let input = StudentInput::default()
//!         .first_name("Ana")
//!         .last_name("Cruz")
//!         .date_of_birth_text("2000-05-01")
//!         .gender(Gender::Female)
//!         .course("CS")
//!         .year_level(2);
//!     let student = client.create_student(input).await?;
//!     assert_eq!(student.id.to_string(), "student_1");
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::StudentActorClient;
use crate::model::Student;
use actor_framework::{Persistence, ResourceActor, StorageError};

/// Creates an in-memory Student actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Student>, StudentActorClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, StudentActorClient::new(generic_client))
}

/// Creates a Student actor whose records are loaded from and written to `persistence`.
pub fn with_persistence(
    buffer_size: usize,
    persistence: impl Persistence<Student>,
) -> Result<(ResourceActor<Student>, StudentActorClient), StorageError> {
    let (actor, generic_client) = ResourceActor::with_persistence(buffer_size, persistence)?;
    Ok((actor, StudentActorClient::new(generic_client)))
}
