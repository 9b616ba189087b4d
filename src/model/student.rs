//! The Student resource and its wire-level input document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Type-safe identifier for Students. Travels as `"student_<n>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(pub u32);

impl From<u32> for StudentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "student_{}", self.0)
    }
}

/// Raised when a string is not of the form `student_<n>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed student id: {0:?}")]
pub struct MalformedStudentId(pub String);

impl FromStr for StudentId {
    type Err = MalformedStudentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("student_")
            .and_then(|n| n.parse().ok())
            .map(StudentId)
            .ok_or_else(|| MalformedStudentId(s.to_string()))
    }
}

impl TryFrom<String> for StudentId {
    type Error = MalformedStudentId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> Self {
        id.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    /// Exact, case-sensitive match. Anything else is rejected, never coerced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or(())
    }
}

/// A persisted student record.
///
/// Every value of this type satisfies the schema: names and course are trimmed and
/// non-empty, `year_level >= 1`. Construct one through the student actor, never by hand
/// outside tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub date_of_birth: DateTime<Utc>,
    pub gender: Gender,
    pub course: String,
    pub year_level: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// "First Middle Last", or "First Last" without a middle name.
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// Orderings the gateway can apply to a listing. Sorting is stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentOrder {
    /// The order records were created in.
    #[default]
    Insertion,
    /// Case-insensitive by last name.
    ByLastName,
    ByCreatedAt,
}

impl StudentOrder {
    pub fn apply(self, students: &mut [Student]) {
        match self {
            StudentOrder::Insertion => {}
            StudentOrder::ByLastName => students.sort_by_cached_key(|s| s.last_name.to_lowercase()),
            StudentOrder::ByCreatedAt => students.sort_by_key(|s| s.created_at),
        }
    }
}

/// Create/update payload as it travels over the wire.
///
/// Every field is optional: on create, missing required fields are reported by the schema;
/// on update, a missing field keeps its stored value. `gender`, `dateOfBirth` and
/// `yearLevel` stay loosely typed so out-of-enum strings, malformed dates and non-integers
/// reach validation and come back as field errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_level: Option<serde_json::Number>,
}

impl StudentInput {
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn middle_name(mut self, value: impl Into<String>) -> Self {
        self.middle_name = Some(value.into());
        self
    }

    pub fn date_of_birth(mut self, instant: DateTime<Utc>) -> Self {
        self.date_of_birth = Some(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        self
    }

    /// Raw date text, e.g. `"2000-05-01"`.
    pub fn date_of_birth_text(mut self, value: impl Into<String>) -> Self {
        self.date_of_birth = Some(value.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender.as_str().to_string());
        self
    }

    /// Raw gender text, validated against the enum later.
    pub fn gender_text(mut self, value: impl Into<String>) -> Self {
        self.gender = Some(value.into());
        self
    }

    pub fn course(mut self, value: impl Into<String>) -> Self {
        self.course = Some(value.into());
        self
    }

    pub fn year_level(mut self, value: i64) -> Self {
        self.year_level = Some(value.into());
        self
    }

    /// This input with every unspecified field taken from `current`.
    pub fn merged_over(&self, current: &Student) -> StudentInput {
        let stored = StudentInput::from(current);
        StudentInput {
            first_name: self.first_name.clone().or(stored.first_name),
            last_name: self.last_name.clone().or(stored.last_name),
            middle_name: self.middle_name.clone().or(stored.middle_name),
            date_of_birth: self.date_of_birth.clone().or(stored.date_of_birth),
            gender: self.gender.clone().or(stored.gender),
            course: self.course.clone().or(stored.course),
            year_level: self.year_level.clone().or(stored.year_level),
        }
    }
}

impl From<&Student> for StudentInput {
    fn from(student: &Student) -> Self {
        let input = StudentInput::default()
            .first_name(&student.first_name)
            .last_name(&student.last_name)
            .date_of_birth(student.date_of_birth)
            .gender(student.gender)
            .course(&student.course)
            .year_level(i64::from(student.year_level));
        match &student.middle_name {
            Some(middle) => input.middle_name(middle),
            None => input,
        }
    }
}
