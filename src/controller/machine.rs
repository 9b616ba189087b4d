//! # Student Management State Machine
//!
//! Pure state transitions: every [`UiEvent`] or [`Completion`] updates the state and
//! returns the [`Effect`]s (client calls) to run. Nothing here performs I/O; the
//! [`driver`](super::driver) executes the effects and feeds their completions back.
//!
//! Every effect carries a [`Ticket`]. Only the completion of the currently outstanding
//! fetch or mutation is applied; anything else (after an unmount, or for a superseded
//! fetch) is ignored.
//!
//! After every successful mutation the list is fetched again in full.

use super::driver::Machine;
use super::form::{FormField, StudentForm};
use super::state::{push_notification, ControllerSnapshot, ListState, ModalState, Notification};
use super::view::{page_count, SortOrder};
use crate::clients::RemoteError;
use crate::model::{Student, StudentId, StudentInput};
use crate::schema::FieldError;
use tracing::debug;

pub type Ticket = u64;

/// Interactions of the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Mount,
    Unmount,
    /// Fetch the list again.
    Reload,
    /// Open the modal for a new record.
    Add,
    /// Open the modal for an existing record.
    Edit(Student),
    EditForm(FormField),
    Submit,
    /// Close the modal without saving.
    Cancel,
    /// Ask for confirmation before deleting.
    RequestDelete(Student),
    ConfirmDelete,
    DismissDelete,
    SortByLastName(Option<SortOrder>),
    ShowPage(usize),
}

/// Outcome of an [`Effect`], tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Listed {
        ticket: Ticket,
        result: Result<Vec<Student>, RemoteError>,
    },
    Created {
        ticket: Ticket,
        result: Result<Student, RemoteError>,
    },
    Updated {
        ticket: Ticket,
        result: Result<Student, RemoteError>,
    },
    Deleted {
        ticket: Ticket,
        result: Result<(), RemoteError>,
    },
}

/// A client call requested by the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch {
        ticket: Ticket,
    },
    Create {
        ticket: Ticket,
        input: StudentInput,
    },
    Update {
        ticket: Ticket,
        id: StudentId,
        input: StudentInput,
    },
    Delete {
        ticket: Ticket,
        id: StudentId,
    },
}

pub const FETCH_FAILED: &str = "Failed to fetch students";
pub const CREATED: &str = "Student created successfully";
pub const UPDATED: &str = "Student updated successfully";
pub const DELETED: &str = "Student deleted successfully";
pub const CREATE_FAILED: &str = "Failed to create student";
pub const UPDATE_FAILED: &str = "Failed to update student";
pub const DELETE_FAILED: &str = "Failed to delete student";
pub const GONE: &str = "Student no longer exists";

/// State of the student management page.
#[derive(Debug)]
pub struct StudentsController {
    mounted: bool,
    list: ListState<Student>,
    modal: ModalState,
    form: StudentForm,
    form_errors: Vec<FieldError>,
    pending_delete: Option<Student>,
    notifications: Vec<Notification>,
    sort: Option<SortOrder>,
    page: usize,
    page_size: usize,
    next_ticket: Ticket,
    fetch_ticket: Option<Ticket>,
    mutation_ticket: Option<Ticket>,
    /// Bumped whenever the modal is opened or closed.
    modal_generation: u64,
    /// Generation of the modal the outstanding create/update was submitted from.
    submitted_from: Option<u64>,
}

impl StudentsController {
    pub fn new(page_size: usize) -> Self {
        Self {
            mounted: false,
            list: ListState::Idle,
            modal: ModalState::Closed,
            form: StudentForm::default(),
            form_errors: Vec::new(),
            pending_delete: None,
            notifications: Vec::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            next_ticket: 1,
            fetch_ticket: None,
            mutation_ticket: None,
            modal_generation: 0,
            submitted_from: None,
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            list: self.list.clone(),
            modal: self.modal.clone(),
            form: self.form.clone(),
            form_errors: self.form_errors.clone(),
            submitting: self.mutation_ticket.is_some(),
            pending_delete: self.pending_delete.clone(),
            notifications: self.notifications.clone(),
            sort: self.sort,
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Vec<Effect> {
        if !self.mounted && event != UiEvent::Mount {
            debug!(?event, "Ignoring event while unmounted");
            return Vec::new();
        }
        match event {
            UiEvent::Mount => {
                self.mounted = true;
                self.fetch()
            }
            UiEvent::Unmount => {
                // Outstanding tickets are forgotten, so late completions are ignored.
                *self = Self {
                    next_ticket: self.next_ticket,
                    notifications: std::mem::take(&mut self.notifications),
                    ..Self::new(self.page_size)
                };
                Vec::new()
            }
            UiEvent::Reload => self.fetch(),
            UiEvent::Add => {
                self.open(ModalState::OpenForCreate, StudentForm::default());
                Vec::new()
            }
            UiEvent::Edit(student) => {
                let form = StudentForm::from_student(&student);
                self.open(ModalState::OpenForEdit(student), form);
                Vec::new()
            }
            UiEvent::EditForm(edit) => {
                let field = edit.field();
                self.form.set(edit);
                self.form_errors.retain(|e| e.field != field);
                Vec::new()
            }
            UiEvent::Submit => self.submit(),
            UiEvent::Cancel => {
                self.close_modal();
                self.form_errors.clear();
                Vec::new()
            }
            UiEvent::RequestDelete(student) => {
                self.pending_delete = Some(student);
                Vec::new()
            }
            UiEvent::ConfirmDelete => self.confirm_delete(),
            UiEvent::DismissDelete => {
                self.pending_delete = None;
                Vec::new()
            }
            UiEvent::SortByLastName(order) => {
                self.sort = order;
                self.page = 1;
                Vec::new()
            }
            UiEvent::ShowPage(page) => {
                self.page = page.clamp(1, self.page_count());
                Vec::new()
            }
        }
    }

    pub fn handle_completion(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::Listed { ticket, result } => {
                if self.fetch_ticket != Some(ticket) {
                    debug!(ticket, "Ignoring stale list completion");
                    return Vec::new();
                }
                self.fetch_ticket = None;
                self.listed(result);
                Vec::new()
            }
            Completion::Created { ticket, result } => {
                if !self.take_mutation(ticket) {
                    return Vec::new();
                }
                self.saved(result, CREATED, CREATE_FAILED)
            }
            Completion::Updated { ticket, result } => {
                if !self.take_mutation(ticket) {
                    return Vec::new();
                }
                self.saved(result, UPDATED, UPDATE_FAILED)
            }
            Completion::Deleted { ticket, result } => {
                if !self.take_mutation(ticket) {
                    return Vec::new();
                }
                self.deleted(result)
            }
        }
    }

    fn issue(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn notify(&mut self, notification: Notification) {
        debug!(level = ?notification.level, message = %notification.message, "Notify");
        push_notification(&mut self.notifications, notification);
    }

    fn page_count(&self) -> usize {
        page_count(self.list.records().len(), self.page_size)
    }

    fn open(&mut self, modal: ModalState, form: StudentForm) {
        self.modal_generation += 1;
        self.modal = modal;
        self.form = form;
        self.form_errors.clear();
    }

    fn close_modal(&mut self) {
        self.modal_generation += 1;
        self.modal = ModalState::Closed;
    }

    /// Starts a fetch. A fetch already in flight is superseded.
    fn fetch(&mut self) -> Vec<Effect> {
        let ticket = self.issue();
        self.fetch_ticket = Some(ticket);
        let previous = std::mem::take(&mut self.list).into_records();
        self.list = ListState::Loading { stale: previous };
        debug!(ticket, "Loading");
        vec![Effect::Fetch { ticket }]
    }

    fn listed(&mut self, result: Result<Vec<Student>, RemoteError>) {
        let previous = std::mem::take(&mut self.list).into_records();
        match result {
            Ok(rows) => {
                debug!(count = rows.len(), "Loaded");
                self.list = ListState::Loaded(rows);
                self.page = self.page.min(self.page_count());
            }
            Err(e) => {
                debug!(error = %e, "List failed");
                self.list = ListState::Error {
                    message: FETCH_FAILED.to_string(),
                    retained: previous,
                };
                self.notify(Notification::error(FETCH_FAILED));
            }
        }
    }

    /// True if `ticket` is the outstanding mutation, which is then cleared.
    fn take_mutation(&mut self, ticket: Ticket) -> bool {
        if self.mutation_ticket != Some(ticket) {
            debug!(ticket, "Ignoring stale mutation completion");
            return false;
        }
        self.mutation_ticket = None;
        true
    }

    fn submit(&mut self) -> Vec<Effect> {
        let target = match &self.modal {
            ModalState::Closed => {
                debug!("Submit without an open modal");
                return Vec::new();
            }
            ModalState::OpenForCreate => None,
            ModalState::OpenForEdit(student) => Some(student.id),
        };
        if self.mutation_ticket.is_some() {
            debug!("Submit dropped, a request is outstanding");
            return Vec::new();
        }
        let input = match self.form.to_input() {
            Ok(input) => input,
            Err(missing) => {
                self.form_errors = missing.0;
                return Vec::new();
            }
        };
        self.form_errors.clear();

        let ticket = self.issue();
        self.mutation_ticket = Some(ticket);
        self.submitted_from = Some(self.modal_generation);
        match target {
            None => vec![Effect::Create { ticket, input }],
            Some(id) => vec![Effect::Update { ticket, id, input }],
        }
    }

    fn saved(
        &mut self,
        result: Result<Student, RemoteError>,
        success: &str,
        failure: &str,
    ) -> Vec<Effect> {
        // A modal opened after the submit belongs to a newer edit and is left alone.
        let same_modal = self.submitted_from.take() == Some(self.modal_generation);
        match result {
            Ok(student) => {
                debug!(id = %student.id, same_modal, "Saved");
                if same_modal {
                    self.close_modal();
                    self.form = StudentForm::default();
                }
                self.notify(Notification::success(success));
                self.fetch()
            }
            Err(RemoteError::Validation(errors)) if same_modal && self.modal.is_open() => {
                self.form_errors = errors.0;
                Vec::new()
            }
            Err(RemoteError::NotFound(_)) => {
                if same_modal {
                    self.close_modal();
                }
                self.notify(Notification::error(GONE));
                self.fetch()
            }
            Err(e) => {
                self.notify(Notification::error(format!("{failure}: {e}")));
                Vec::new()
            }
        }
    }

    fn confirm_delete(&mut self) -> Vec<Effect> {
        if self.mutation_ticket.is_some() {
            debug!("Delete dropped, a request is outstanding");
            return Vec::new();
        }
        let Some(student) = self.pending_delete.take() else {
            return Vec::new();
        };
        let ticket = self.issue();
        self.mutation_ticket = Some(ticket);
        vec![Effect::Delete {
            ticket,
            id: student.id,
        }]
    }

    fn deleted(&mut self, result: Result<(), RemoteError>) -> Vec<Effect> {
        match result {
            Ok(()) => {
                self.notify(Notification::success(DELETED));
                self.fetch()
            }
            Err(RemoteError::NotFound(_)) => {
                self.notify(Notification::error(GONE));
                self.fetch()
            }
            Err(e) => {
                self.notify(Notification::error(format!("{DELETE_FAILED}: {e}")));
                Vec::new()
            }
        }
    }
}

impl Machine for StudentsController {
    type Event = UiEvent;
    type Effect = Effect;
    type Completion = Completion;
    type Snapshot = ControllerSnapshot;

    fn on_event(&mut self, event: UiEvent) -> Vec<Effect> {
        self.handle_event(event)
    }

    fn on_completion(&mut self, completion: Completion) -> Vec<Effect> {
        self.handle_completion(completion)
    }

    fn snapshot(&self) -> ControllerSnapshot {
        StudentsController::snapshot(self)
    }
}
