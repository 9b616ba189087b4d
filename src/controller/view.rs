//! Client-side sorting and page slicing over a loaded list.

use crate::model::{Student, User};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Columns the users table can sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserSort {
    FirstName,
    RegisteredAt,
}

/// Stable, case-insensitive sort on last name.
pub fn sort_students(rows: &mut [Student], order: SortOrder) {
    rows.sort_by(|a, b| {
        order.apply(a.last_name.to_lowercase().cmp(&b.last_name.to_lowercase()))
    });
}

pub fn sort_users(rows: &mut [User], column: UserSort, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = match column {
            UserSort::FirstName => a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()),
            UserSort::RegisteredAt => a.created_at.cmp(&b.created_at),
        };
        order.apply(ordering)
    });
}

/// Number of pages needed for `len` rows. An empty list still has one (empty) page.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Rows of the 1-based `page`. Past the end, the page is empty.
pub fn page_of<T: Clone>(rows: &[T], page: usize, page_size: usize) -> Vec<T> {
    let size = page_size.max(1);
    rows.iter()
        .skip(page.saturating_sub(1) * size)
        .take(size)
        .cloned()
        .collect()
}
