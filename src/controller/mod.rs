//! # Resource Controller
//!
//! UI state for the student management and users pages, independent of any rendering.
//!
//! - [`machine`] - the student management state machine
//! - [`users`] - the users list state machine
//! - [`form`] - the edit form and the calendar date / instant boundary
//! - [`state`] - snapshots handed to the presentation layer
//! - [`view`] - client-side sorting and paging
//! - [`driver`] - runs a machine on a Tokio task
//! - [`api`] - the client operations the machines call

pub mod api;
pub mod driver;
pub mod form;
pub mod machine;
pub mod state;
pub mod users;
pub mod view;

pub use api::{StudentApi, UserApi};
pub use driver::{spawn_controller, ControllerClosed, ControllerHandle, Machine, Perform};
pub use form::{FormField, StudentForm};
pub use machine::{Completion, Effect, StudentsController, Ticket, UiEvent};
pub use state::{
    ControllerSnapshot, ListState, ModalState, Notification, NotificationLevel, UsersSnapshot,
    NOTIFICATION_LIMIT,
};
pub use users::{UsersController, UsersEvent};
pub use view::{SortOrder, UserSort};

use std::sync::Arc;
use tokio::task::JoinHandle;

/// Starts the student management controller against `api`.
pub fn spawn_students(
    api: Arc<dyn StudentApi>,
    page_size: usize,
) -> (ControllerHandle<StudentsController>, JoinHandle<()>) {
    spawn_controller(StudentsController::new(page_size), api, 32)
}

/// Starts the users list controller against `api`.
pub fn spawn_users(
    api: Arc<dyn UserApi>,
    page_size: usize,
) -> (ControllerHandle<UsersController>, JoinHandle<()>) {
    spawn_controller(UsersController::new(page_size), api, 32)
}
