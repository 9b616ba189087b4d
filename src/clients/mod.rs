//! Clients of the system.
//!
//! - [`StudentActorClient`], [`UserActorClient`]: typed wrappers over the actors'
//!   `ResourceClient`s, used by the gateway.
//! - [`StudentClient`], [`UserDirectoryClient`]: remote clients that reach the gateway
//!   through a [`Transport`] and report failures as [`RemoteError`].

pub mod error;
pub mod student_actor_client;
pub mod student_client;
pub mod transport;
pub mod user_actor_client;

pub use error::RemoteError;
pub use student_actor_client::StudentActorClient;
pub use student_client::{StudentClient, UserDirectoryClient};
pub use transport::{InProcessTransport, Transport, TransportError};
pub use user_actor_client::UserActorClient;
