//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the server half of a resource. It owns the entity
//! store and the receiving end of the request channel, and processes messages sequentially, so
//! the store needs no `Mutex` or `RwLock`.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::{FrameworkError, StorageError};
use crate::message::ResourceRequest;
use crate::store::{InMemoryPersistence, Persistence};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Pending change used to build the snapshot handed to [`Persistence::save`].
enum Change<'a, T: ActorEntity> {
    Insert(&'a T),
    Replace(&'a T),
    Remove(&'a T::Id),
}

/// The records as they will be after `change` is committed, in insertion order.
fn staged<'a, T: ActorEntity>(
    store: &'a HashMap<T::Id, T>,
    order: &'a [T::Id],
    change: Change<'a, T>,
) -> Vec<&'a T> {
    let mut view: Vec<&'a T> = Vec::with_capacity(order.len() + 1);
    for id in order {
        match &change {
            Change::Replace(item) if item.id() == id => view.push(*item),
            Change::Remove(removed) if *removed == id => {}
            _ => view.extend(store.get(id)),
        }
    }
    if let Change::Insert(item) = change {
        view.push(item);
    }
    view
}

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` (or `with_persistence`) to get the actor and its client.
/// 2.  **Wire**: Pass dependencies into `actor.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Tag { id: u32, label: String }
/// #[derive(Debug)] struct TagCreate(String);
/// #[derive(Debug)] struct TagUpdate(String);
/// #[derive(Debug, thiserror::Error)] #[error("tag error")] struct TagError;
///
/// #[async_trait]
/// impl ActorEntity for Tag {
///     type Id = u32;
///     type Create = TagCreate;
///     type Update = TagUpdate;
///     type Context = ();
///     type Error = TagError;
///
///     fn id(&self) -> &u32 { &self.id }
///     fn from_create_params(id: u32, p: TagCreate) -> Result<Self, TagError> {
///         Ok(Self { id, label: p.0 })
///     }
///     async fn on_update(&mut self, u: TagUpdate, _: &()) -> Result<(), TagError> {
///         self.label = u.0;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Tag>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let tag = client.create(TagCreate("urgent".into())).await.unwrap();
///     assert_eq!(tag.id, 1);
///     assert_eq!(client.list().await.unwrap().len(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: builds the entity under the next ID, runs `on_create`, persists, inserts.
/// * **Get** / **List**: clones out of the store; `List` keeps insertion order.
/// * **Update**: runs `on_update` on a working copy, persists, then swaps the copy in.
/// * **Delete**: runs `on_delete`, persists, removes.
///
/// A hook error or a storage error leaves the store exactly as it was.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    next_id: u32,
    persistence: Box<dyn Persistence<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new in-memory `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full, client calls
    /// wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            persistence: Box::new(InMemoryPersistence::default()),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates an actor whose state is loaded from, and mirrored into, `persistence`.
    pub fn with_persistence(
        buffer_size: usize,
        mut persistence: impl Persistence<T>,
    ) -> Result<(Self, ResourceClient<T>), StorageError> {
        let snapshot = persistence.load()?;
        let (mut actor, client) = Self::new(buffer_size);
        for record in snapshot.records {
            let id = record.id().clone();
            if actor.store.insert(id.clone(), record).is_none() {
                actor.order.push(id);
            }
        }
        actor.next_id = snapshot.next_id.max(1);
        actor.persistence = Box::new(persistence);
        Ok((actor, client))
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Student" instead of "student_records::model::student::Student"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    match &result {
                        Ok(item) => {
                            info!(entity_type, id = %item.id(), size = self.store.len(), "Created")
                        }
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let items: Vec<T> = self
                        .order
                        .iter()
                        .filter_map(|id| self.store.get(id))
                        .cloned()
                        .collect();
                    debug!(entity_type, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(&id, update, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(FrameworkError::NotFound(_)) => warn!(entity_type, %id, "Not found"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(&id, &context).await;
                    match &result {
                        Ok(()) => info!(entity_type, %id, size = self.store.len(), "Deleted"),
                        Err(FrameworkError::NotFound(_)) => warn!(entity_type, %id, "Not found"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(&mut self, params: T::Create, context: &T::Context) -> Result<T, FrameworkError> {
        let id = T::Id::from(self.next_id);
        let mut item = T::from_create_params(id.clone(), params)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        item.on_create(context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        self.persistence.save(
            self.next_id + 1,
            &staged(&self.store, &self.order, Change::Insert(&item)),
        )?;
        self.next_id += 1;
        self.store.insert(id.clone(), item.clone());
        self.order.push(id);
        Ok(item)
    }

    async fn update(
        &mut self,
        id: &T::Id,
        update: T::Update,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let mut working = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        working
            .on_update(update, context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        self.persistence.save(
            self.next_id,
            &staged(&self.store, &self.order, Change::Replace(&working)),
        )?;
        self.store.insert(id.clone(), working.clone());
        Ok(working)
    }

    async fn delete(&mut self, id: &T::Id, context: &T::Context) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete(context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        self.persistence.save(
            self.next_id,
            &staged(&self.store, &self.order, Change::Remove(id)),
        )?;
        self.store.remove(id);
        self.order.retain(|kept| kept != id);
        Ok(())
    }
}
