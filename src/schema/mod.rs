//! # Student Schema
//!
//! Shape and constraints of a Student record. [`validate`] turns a loosely-typed
//! [`StudentInput`] into a [`ValidatedStudent`], or reports **every** violated constraint at
//! once as [`ValidationErrors`].
//!
//! Constraints:
//! - `firstName`, `lastName`, `course`: required, non-empty after trimming
//! - `middleName`: optional, trimmed; blank counts as absent
//! - `dateOfBirth`: required, `YYYY-MM-DD` (midnight UTC) or an RFC 3339 instant
//! - `gender`: required, exactly one of `Male`, `Female`, `Other`
//! - `yearLevel`: required integer, at least 1
//!
//! Nothing is coerced: an out-of-enum gender or a fractional year level is rejected.

use crate::model::{Gender, StudentInput};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A candidate that passed [`validate`]. All strings are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStudent {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: DateTime<Utc>,
    pub gender: Gender,
    pub course: String,
    pub year_level: u32,
}

/// Fields of a Student, in declaration order. Serialized with their wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudentField {
    FirstName,
    LastName,
    MiddleName,
    DateOfBirth,
    Gender,
    Course,
    YearLevel,
}

impl StudentField {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentField::FirstName => "firstName",
            StudentField::LastName => "lastName",
            StudentField::MiddleName => "middleName",
            StudentField::DateOfBirth => "dateOfBirth",
            StudentField::Gender => "gender",
            StudentField::Course => "course",
            StudentField::YearLevel => "yearLevel",
        }
    }
}

impl Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    InvalidEnum,
    OutOfRange,
    NotInteger,
    InvalidDate,
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: StudentField,
    pub kind: ViolationKind,
}

impl FieldError {
    pub fn new(field: StudentField, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Required => write!(f, "{} is required", self.field),
            ViolationKind::InvalidEnum => {
                write!(f, "{} must be one of Male, Female, Other", self.field)
            }
            ViolationKind::OutOfRange => write!(f, "{} must be at least 1", self.field),
            ViolationKind::NotInteger => write!(f, "{} must be an integer", self.field),
            ViolationKind::InvalidDate => write!(f, "{} is not a valid date", self.field),
        }
    }
}

/// Every constraint a candidate violated, in field declaration order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("Validation failed: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn contains(&self, field: StudentField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn kind_of(&self, field: StudentField) -> Option<ViolationKind> {
        self.0.iter().find(|e| e.field == field).map(|e| e.kind)
    }
}

/// Validates a complete candidate. No side effects.
pub fn validate(candidate: &StudentInput) -> Result<ValidatedStudent, ValidationErrors> {
    let mut errors = Vec::new();

    let first_name = check(&mut errors, StudentField::FirstName, required_text(&candidate.first_name));
    let last_name = check(&mut errors, StudentField::LastName, required_text(&candidate.last_name));
    let middle_name = optional_text(&candidate.middle_name);
    let date_of_birth = check(
        &mut errors,
        StudentField::DateOfBirth,
        required(&candidate.date_of_birth).and_then(parse_date),
    );
    let gender = check(
        &mut errors,
        StudentField::Gender,
        required(&candidate.gender)
            .and_then(|raw| raw.parse::<Gender>().map_err(|()| ViolationKind::InvalidEnum)),
    );
    let course = check(&mut errors, StudentField::Course, required_text(&candidate.course));
    let year_level = check(
        &mut errors,
        StudentField::YearLevel,
        candidate
            .year_level
            .as_ref()
            .ok_or(ViolationKind::Required)
            .and_then(year_level),
    );

    match (first_name, last_name, date_of_birth, gender, course, year_level) {
        (
            Some(first_name),
            Some(last_name),
            Some(date_of_birth),
            Some(gender),
            Some(course),
            Some(year_level),
        ) => Ok(ValidatedStudent {
            first_name,
            last_name,
            middle_name,
            date_of_birth,
            gender,
            course,
            year_level,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

fn check<T>(
    errors: &mut Vec<FieldError>,
    field: StudentField,
    result: Result<T, ViolationKind>,
) -> Option<T> {
    result
        .map_err(|kind| errors.push(FieldError::new(field, kind)))
        .ok()
}

fn required(value: &Option<String>) -> Result<&str, ViolationKind> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ViolationKind::Required),
    }
}

fn required_text(value: &Option<String>) -> Result<String, ViolationKind> {
    required(value).map(str::to_string)
}

fn optional_text(value: &Option<String>) -> Option<String> {
    required(value).ok().map(str::to_string)
}

/// `YYYY-MM-DD` is read as midnight UTC; anything else must be RFC 3339.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, ViolationKind> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| ViolationKind::InvalidDate)
}

fn year_level(number: &serde_json::Number) -> Result<u32, ViolationKind> {
    let whole = match (number.as_i64(), number.as_u64(), number.as_f64()) {
        (Some(n), _, _) => i128::from(n),
        (None, Some(n), _) => i128::from(n),
        (None, None, Some(f)) if f.fract() == 0.0 && f.is_finite() => f as i128,
        _ => return Err(ViolationKind::NotInteger),
    };
    if whole < 1 {
        return Err(ViolationKind::OutOfRange);
    }
    u32::try_from(whole).map_err(|_| ViolationKind::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ana() -> StudentInput {
        StudentInput::default()
            .first_name("Ana")
            .last_name("Cruz")
            .date_of_birth_text("2000-05-01")
            .gender(Gender::Female)
            .course("CS")
            .year_level(2)
    }

    #[test]
    fn test_valid_candidate_is_trimmed() {
        let candidate = ana().first_name("  Ana ").course(" CS").middle_name("   ");
        let valid = validate(&candidate).unwrap();
        assert_eq!(valid.first_name, "Ana");
        assert_eq!(valid.course, "CS");
        assert_eq!(valid.middle_name, None);
        assert_eq!(valid.year_level, 2);
        assert_eq!(valid.date_of_birth.to_rfc3339(), "2000-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_every_violation_is_reported_in_field_order() {
        let candidate = StudentInput::default()
            .first_name("   ")
            .gender_text("Robot")
            .year_level(0);
        let errors = validate(&candidate).unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| (e.field, e.kind)).collect();
        assert_eq!(
            fields,
            vec![
                (StudentField::FirstName, ViolationKind::Required),
                (StudentField::LastName, ViolationKind::Required),
                (StudentField::DateOfBirth, ViolationKind::Required),
                (StudentField::Gender, ViolationKind::InvalidEnum),
                (StudentField::Course, ViolationKind::Required),
                (StudentField::YearLevel, ViolationKind::OutOfRange),
            ]
        );
    }

    #[rstest]
    #[case::zero(serde_json::json!(0), ViolationKind::OutOfRange)]
    #[case::negative(serde_json::json!(-3), ViolationKind::OutOfRange)]
    #[case::fraction(serde_json::json!(2.5), ViolationKind::NotInteger)]
    #[case::too_large(serde_json::json!(5_000_000_000u64), ViolationKind::OutOfRange)]
    fn test_bad_year_level(#[case] raw: serde_json::Value, #[case] expected: ViolationKind) {
        let mut candidate = ana();
        candidate.year_level = serde_json::from_value(raw).ok();
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::new(StudentField::YearLevel, expected)]);
    }

    #[rstest]
    #[case::whole_float(serde_json::json!(3.0), 3)]
    #[case::one(serde_json::json!(1), 1)]
    fn test_good_year_level(#[case] raw: serde_json::Value, #[case] expected: u32) {
        let mut candidate = ana();
        candidate.year_level = serde_json::from_value(raw).ok();
        assert_eq!(validate(&candidate).unwrap().year_level, expected);
    }

    #[rstest]
    #[case::lowercase("female")]
    #[case::padded_unknown("Unknown")]
    #[case::abbreviation("F")]
    fn test_gender_outside_enum(#[case] raw: &str) {
        let errors = validate(&ana().gender_text(raw)).unwrap_err();
        assert_eq!(errors.kind_of(StudentField::Gender), Some(ViolationKind::InvalidEnum));
    }

    #[rstest]
    #[case::calendar_date("2000-05-01", "2000-05-01T00:00:00+00:00")]
    #[case::instant("2000-05-01T00:00:00.000Z", "2000-05-01T00:00:00+00:00")]
    #[case::offset("2000-05-01T02:00:00+02:00", "2000-05-01T00:00:00+00:00")]
    fn test_accepted_dates(#[case] raw: &str, #[case] expected: &str) {
        let valid = validate(&ana().date_of_birth_text(raw)).unwrap();
        assert_eq!(valid.date_of_birth.to_rfc3339(), expected);
    }

    #[rstest]
    #[case::garbage("yesterday")]
    #[case::bad_month("2000-13-01")]
    fn test_rejected_dates(#[case] raw: &str) {
        let errors = validate(&ana().date_of_birth_text(raw)).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[FieldError::new(StudentField::DateOfBirth, ViolationKind::InvalidDate)]
        );
    }

    #[test]
    fn test_error_message_names_fields() {
        let errors = validate(&ana().year_level(0)).unwrap_err();
        assert_eq!(errors.to_string(), "Validation failed: yearLevel must be at least 1");
        assert!(errors.contains(StudentField::YearLevel));
    }

    #[test]
    fn test_field_error_wire_form() {
        let json = serde_json::to_value(FieldError::new(
            StudentField::YearLevel,
            ViolationKind::NotInteger,
        ))
        .unwrap();
        assert_eq!(json, serde_json::json!({"field": "yearLevel", "kind": "not_integer"}));
    }
}
