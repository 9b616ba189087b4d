//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource must satisfy to be managed by the
//! generic [`ResourceActor`](crate::ResourceActor). It names the associated types for IDs,
//! DTOs, runtime context and errors, and provides the lifecycle hooks (`on_create`,
//! `on_update`, `on_delete`) the actor calls around each mutation.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! You do **not** need to implement these unless you want to customize behavior.
//! The default implementation does nothing (`Ok(())`).
//!
//! # Atomic mutations
//! The actor applies `on_create`/`on_update` to a *copy* of the entity and only commits the
//! copy after the hook succeeded and the persistence layer accepted the new snapshot. A hook
//! that fails halfway through can therefore never leave a half-updated record in the store.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are async so they can call other actors. The `Context` type is injected into every
/// hook, which allows late binding of dependencies (passing them to `run()` instead of `new()`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per actor rather than one per operation. Clients deal with a single
    /// type, at the cost of every operation's signature admitting every variant.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identifier this entity is stored under.
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the freshly generated ID and the payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is constructed and before it is persisted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received. Runs against a working copy.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}
