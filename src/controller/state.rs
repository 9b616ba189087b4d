//! Controller state as seen by the presentation layer.

use super::form::StudentForm;
use super::view::{page_count, page_of, sort_students, sort_users, SortOrder, UserSort};
use crate::model::{Student, User};
use crate::schema::FieldError;

/// Progress of the list fetch.
///
/// A list that was loaded once is never dropped: it is kept while re-fetching and inside
/// the error state.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Idle,
    Loading { stale: Vec<T> },
    Loaded(Vec<T>),
    Error { message: String, retained: Vec<T> },
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        ListState::Idle
    }
}

impl<T> ListState<T> {
    /// The rows to show, whatever the state.
    pub fn records(&self) -> &[T] {
        match self {
            ListState::Idle => &[],
            ListState::Loading { stale } => stale,
            ListState::Loaded(rows) => rows,
            ListState::Error { retained, .. } => retained,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading { .. })
    }

    pub(crate) fn into_records(self) -> Vec<T> {
        match self {
            ListState::Idle => Vec::new(),
            ListState::Loading { stale } => stale,
            ListState::Loaded(rows) => rows,
            ListState::Error { retained, .. } => retained,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    #[default]
    Closed,
    OpenForCreate,
    OpenForEdit(Student),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// How many toasts a snapshot keeps; older ones are dropped first.
pub const NOTIFICATION_LIMIT: usize = 5;

/// Appends `notification`, dropping the oldest toasts beyond [`NOTIFICATION_LIMIT`].
pub(crate) fn push_notification(toasts: &mut Vec<Notification>, notification: Notification) {
    toasts.push(notification);
    if toasts.len() > NOTIFICATION_LIMIT {
        let excess = toasts.len() - NOTIFICATION_LIMIT;
        toasts.drain(..excess);
    }
}

/// A toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the student management page renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub list: ListState<Student>,
    pub modal: ModalState,
    pub form: StudentForm,
    pub form_errors: Vec<FieldError>,
    /// A create/update/delete is outstanding.
    pub submitting: bool,
    /// Record awaiting delete confirmation.
    pub pending_delete: Option<Student>,
    /// The most recent notifications, oldest first.
    pub notifications: Vec<Notification>,
    pub sort: Option<SortOrder>,
    pub page: usize,
    pub page_size: usize,
}

impl ControllerSnapshot {
    /// The current page of the list, sorted if a sort is selected.
    pub fn visible_rows(&self) -> Vec<Student> {
        let mut rows = self.list.records().to_vec();
        if let Some(order) = self.sort {
            sort_students(&mut rows, order);
        }
        page_of(&rows, self.page, self.page_size)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.list.records().len(), self.page_size)
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

/// Everything the users page renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct UsersSnapshot {
    pub list: ListState<User>,
    pub notifications: Vec<Notification>,
    pub sort: Option<(UserSort, SortOrder)>,
    pub page: usize,
    pub page_size: usize,
}

impl UsersSnapshot {
    pub fn visible_rows(&self) -> Vec<User> {
        let mut rows = self.list.records().to_vec();
        if let Some((column, order)) = self.sort {
            sort_users(&mut rows, column, order);
        }
        page_of(&rows, self.page, self.page_size)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.list.records().len(), self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_keep_only_the_newest() {
        let mut toasts = Vec::new();
        for n in 0..NOTIFICATION_LIMIT + 3 {
            push_notification(&mut toasts, Notification::success(format!("saved {n}")));
        }

        assert_eq!(toasts.len(), NOTIFICATION_LIMIT);
        assert_eq!(toasts[0].message, "saved 3");
        assert_eq!(
            toasts.last(),
            Some(&Notification::success(format!("saved {}", NOTIFICATION_LIMIT + 2)))
        );
    }
}
