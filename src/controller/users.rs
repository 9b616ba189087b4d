//! # Users List
//!
//! Read-only view over the user directory: fetched on mount, sortable by first name or
//! registration date, paged client-side.

use super::driver::Machine;
use super::machine::Ticket;
use super::state::{push_notification, ListState, Notification, UsersSnapshot};
use super::view::{page_count, SortOrder, UserSort};
use crate::clients::RemoteError;
use crate::model::User;
use tracing::debug;

pub const USERS_FETCH_FAILED: &str = "Failed to fetch users";

#[derive(Debug, Clone, PartialEq)]
pub enum UsersEvent {
    Mount,
    Unmount,
    SortBy(Option<(UserSort, SortOrder)>),
    ShowPage(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsersListed {
    pub ticket: Ticket,
    pub result: Result<Vec<User>, RemoteError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchUsers {
    pub ticket: Ticket,
}

#[derive(Debug)]
pub struct UsersController {
    list: ListState<User>,
    notifications: Vec<Notification>,
    sort: Option<(UserSort, SortOrder)>,
    page: usize,
    page_size: usize,
    next_ticket: Ticket,
    fetch_ticket: Option<Ticket>,
}

impl UsersController {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListState::Idle,
            notifications: Vec::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            next_ticket: 1,
            fetch_ticket: None,
        }
    }

    pub fn handle_event(&mut self, event: UsersEvent) -> Vec<FetchUsers> {
        match event {
            UsersEvent::Mount => {
                let ticket = self.next_ticket;
                self.next_ticket += 1;
                self.fetch_ticket = Some(ticket);
                let previous = std::mem::take(&mut self.list).into_records();
                self.list = ListState::Loading { stale: previous };
                vec![FetchUsers { ticket }]
            }
            UsersEvent::Unmount => {
                self.fetch_ticket = None;
                self.list = ListState::Idle;
                Vec::new()
            }
            UsersEvent::SortBy(sort) => {
                self.sort = sort;
                self.page = 1;
                Vec::new()
            }
            UsersEvent::ShowPage(page) => {
                self.page = page.clamp(1, page_count(self.list.records().len(), self.page_size));
                Vec::new()
            }
        }
    }

    pub fn handle_completion(&mut self, listed: UsersListed) -> Vec<FetchUsers> {
        if self.fetch_ticket != Some(listed.ticket) {
            debug!(ticket = listed.ticket, "Ignoring stale users completion");
            return Vec::new();
        }
        self.fetch_ticket = None;
        let previous = std::mem::take(&mut self.list).into_records();
        match listed.result {
            Ok(users) => self.list = ListState::Loaded(users),
            Err(e) => {
                debug!(error = %e, "Users list failed");
                self.list = ListState::Error {
                    message: USERS_FETCH_FAILED.to_string(),
                    retained: previous,
                };
                push_notification(
                    &mut self.notifications,
                    Notification::error(USERS_FETCH_FAILED),
                );
            }
        }
        Vec::new()
    }

    pub fn snapshot(&self) -> UsersSnapshot {
        UsersSnapshot {
            list: self.list.clone(),
            notifications: self.notifications.clone(),
            sort: self.sort,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl Machine for UsersController {
    type Event = UsersEvent;
    type Effect = FetchUsers;
    type Completion = UsersListed;
    type Snapshot = UsersSnapshot;

    fn on_event(&mut self, event: UsersEvent) -> Vec<FetchUsers> {
        self.handle_event(event)
    }

    fn on_completion(&mut self, completion: UsersListed) -> Vec<FetchUsers> {
        self.handle_completion(completion)
    }

    fn snapshot(&self) -> UsersSnapshot {
        UsersController::snapshot(self)
    }
}
