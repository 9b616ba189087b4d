//! # System Lifecycle & Orchestration
//!
//! [`RecordsSystem`] wires the whole stack together:
//!
//! 1. **Actor Creation** - the student and user actors, backed by JSON snapshot files when
//!    configured, in memory otherwise
//! 2. **Context Injection** - both actors get the [`RecordsContext`] (clock) via `run(context)`
//! 3. **Gateway** - a [`GatewayService`] over the actor clients, served through an
//!    [`InProcessTransport`] with the configured request timeout
//! 4. **Clients** - [`StudentClient`] and [`UserDirectoryClient`] on top of the transport
//! 5. **Graceful Shutdown** - dropping the clients closes the transport, which stops the
//!    gateway, which drops the actor clients, which stops the actors
//!
//! ```rust,no_run
//! use student_records::config::Config;
//! use student_records::lifecycle::RecordsSystem;
//! use student_records::model::StudentOrder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = RecordsSystem::start(&Config::default())?;
//!     let students = system.student_client.list_all(StudentOrder::ByLastName).await?;
//!     println!("{} students", students.len());
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! Shutdown waits for every task, so every clone of the clients (including the ones held
//! by running controllers) must be dropped first.

use crate::clients::{
    InProcessTransport, StudentActorClient, StudentClient, Transport, UserActorClient,
    UserDirectoryClient,
};
use crate::config::Config;
use crate::context::RecordsContext;
use crate::controller::{
    spawn_students, spawn_users, ControllerHandle, StudentsController, UsersController,
};
use crate::gateway::GatewayService;
use crate::model::{Student, User, UserRegistration};
use crate::user_actor::UserError;
use crate::{student_actor, user_actor};
use actor_framework::{JsonFilePersistence, ResourceActor, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not open the record store: {0}")]
    Storage(#[from] StorageError),
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

pub struct RecordsSystem {
    /// Remote client for student records.
    pub student_client: StudentClient,

    /// Remote client for the user directory.
    pub user_directory: UserDirectoryClient,

    /// Direct client of the user actor, for seeding.
    users: UserActorClient,

    page_size: usize,

    /// Gateway and actor tasks (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl RecordsSystem {
    /// Starts every actor and the gateway with the system clock. Must run inside Tokio.
    pub fn start(config: &Config) -> Result<Self, LifecycleError> {
        Self::start_with_context(config, RecordsContext::system())
    }

    /// Like [`RecordsSystem::start`] with an explicit context, e.g. a manual clock.
    pub fn start_with_context(
        config: &Config,
        context: RecordsContext,
    ) -> Result<Self, LifecycleError> {
        let buffer = config.channel_buffer;

        // 1. Create actors; a missing snapshot file starts an empty store
        let (student_actor, students): (ResourceActor<Student>, StudentActorClient) =
            match &config.data_file {
                Some(path) => {
                    student_actor::with_persistence(buffer, JsonFilePersistence::new(path))?
                }
                None => student_actor::new(buffer),
            };
        let (user_actor, users): (ResourceActor<User>, UserActorClient) =
            match &config.users_file {
                Some(path) => user_actor::with_persistence(buffer, JsonFilePersistence::new(path))?,
                None => user_actor::new(buffer),
            };

        // 2. Start actors with injected context
        let student_handle = tokio::spawn(student_actor.run(context.clone()));
        let user_handle = tokio::spawn(user_actor.run(context));

        // 3. Serve the gateway
        let gateway = GatewayService::new(students, users.clone());
        let (transport, gateway_handle) =
            InProcessTransport::serve(gateway, buffer, config.request_timeout());
        let transport: Arc<dyn Transport> = Arc::new(transport);

        info!(
            data_file = ?config.data_file,
            users_file = ?config.users_file,
            "Records system started"
        );

        Ok(Self {
            student_client: StudentClient::new(transport.clone()),
            user_directory: UserDirectoryClient::new(transport),
            users,
            page_size: config.page_size,
            handles: vec![gateway_handle, student_handle, user_handle],
        })
    }

    /// Registers users in the directory, in order.
    pub async fn seed_users(
        &self,
        registrations: Vec<UserRegistration>,
    ) -> Result<Vec<User>, UserError> {
        let mut seeded = Vec::with_capacity(registrations.len());
        for registration in registrations {
            seeded.push(self.users.register(registration).await?);
        }
        info!(count = seeded.len(), "Users seeded");
        Ok(seeded)
    }

    /// Starts a student management controller on this system's client.
    pub fn students_controller(&self) -> (ControllerHandle<StudentsController>, JoinHandle<()>) {
        spawn_students(Arc::new(self.student_client.clone()), self.page_size)
    }

    /// Starts a users list controller on this system's client.
    pub fn users_controller(&self) -> (ControllerHandle<UsersController>, JoinHandle<()>) {
        spawn_users(Arc::new(self.user_directory.clone()), self.page_size)
    }

    /// Gracefully shuts down the gateway and the actors.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if every task finished cleanly
    /// - `Err(LifecycleError::TaskFailed)` if a task panicked
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down system...");

        // Closing the transport stops the gateway, which releases the actor clients.
        drop(self.student_client);
        drop(self.user_directory);
        drop(self.users);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(LifecycleError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
