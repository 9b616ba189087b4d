//! # Student Records
//!
//! Administration core for student records: list, create, edit and delete students, and
//! list registered users. Built on the resource actors of [`actor_framework`].
//!
//! ## Core Components
//!
//! - **[schema]**: shape and validation constraints of a Student record
//! - **[student_actor]** / **[user_actor]**: resource actors owning the records
//! - **[gateway]**: executes the wire operations against the actors
//! - **[clients]**: typed clients over the actors and over the gateway transport
//! - **[controller]**: UI state machines with refresh-after-mutation
//! - **[lifecycle]**: wiring, start-up and graceful shutdown
//!
//! ## Control Flow
//!
//! ```text
//! controller --UiEvent--> StudentsController --Effect--> StudentClient
//!     --GatewayRequest (JSON)--> InProcessTransport --> GatewayService
//!     --> StudentActorClient --> ResourceActor<Student> --> Persistence
//! ```
//!
//! Every mutation the controller performs is followed by a full list re-fetch.

pub mod clients;
pub mod config;
pub mod context;
pub mod controller;
pub mod gateway;
pub mod lifecycle;
pub mod model;
pub mod schema;
pub mod student_actor;
pub mod user_actor;
