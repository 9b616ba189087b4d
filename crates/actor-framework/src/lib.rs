//! # Actor Framework
//!
//! Building blocks for resource-oriented actors on Tokio: each resource type gets one actor
//! that owns its records and serves a uniform Create / Get / List / Update / Delete API over
//! message passing.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - the domain model and its lifecycle hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - sequential message processing, the store, persistence
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe communication
//!
//! Business rules live in the entity hooks. The actor guarantees that a failing hook or a
//! failing [`Persistence`](store::Persistence) backend never leaves a partial write behind.
//!
//! ## Context Injection
//!
//! Dependencies are injected at **runtime** via `run(context)`, not at construction time. An
//! entity that needs a clock, or another actor's client, names it as its `Context` type.
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor (no locks on the store)
//! - Concurrent writers to the same record race; the last write wins
//!
//! ## Testing
//!
//! [`mock::MockClient`] scripts the answers a client receives without spawning an actor, and
//! [`mock::SwitchablePersistence`] takes a real actor's storage offline on demand.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::{FrameworkError, StorageError};
pub use message::{ResourceRequest, Response};
pub use store::{InMemoryPersistence, JsonFilePersistence, Persistence, Snapshot};
