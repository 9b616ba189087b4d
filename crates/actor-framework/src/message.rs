//! # Generic Messages
//!
//! The request envelope exchanged between [`ResourceClient`](crate::ResourceClient) and
//! [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants map onto the CRUD lifecycle of a resource, plus `List` for enumeration:
///
/// - **Create**: Uses [`ActorEntity::Create`] to initialize a new resource, answers with the stored record.
/// - **Get**: Fetches the current state of one resource by ID.
/// - **List**: Every stored resource, in insertion order.
/// - **Update**: Uses [`ActorEntity::Update`] to modify an existing resource.
/// - **Delete**: Removes the resource.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
