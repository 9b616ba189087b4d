//! The edit form and its conversion boundary.
//!
//! The form works in calendar dates ([`NaiveDate`]); the wire and the store work in
//! instants. A date crosses the boundary as midnight UTC in both directions, so a record
//! opened for edit and saved unchanged keeps its `dateOfBirth`.

use crate::model::{Gender, Student, StudentInput};
use crate::schema::{FieldError, StudentField, ValidationErrors, ViolationKind};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub fn date_to_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn instant_to_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// One edit of a single form control.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    FirstName(String),
    MiddleName(String),
    LastName(String),
    DateOfBirth(Option<NaiveDate>),
    Gender(Option<Gender>),
    Course(String),
    YearLevel(Option<u32>),
}

impl FormField {
    pub fn field(&self) -> StudentField {
        match self {
            FormField::FirstName(_) => StudentField::FirstName,
            FormField::MiddleName(_) => StudentField::MiddleName,
            FormField::LastName(_) => StudentField::LastName,
            FormField::DateOfBirth(_) => StudentField::DateOfBirth,
            FormField::Gender(_) => StudentField::Gender,
            FormField::Course(_) => StudentField::Course,
            FormField::YearLevel(_) => StudentField::YearLevel,
        }
    }
}

/// Values of the add/edit form, as the user sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub course: String,
    pub year_level: Option<u32>,
}

impl Default for StudentForm {
    /// A cleared form. Gender starts on `Male`.
    fn default() -> Self {
        Self {
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            date_of_birth: None,
            gender: Some(Gender::Male),
            course: String::new(),
            year_level: None,
        }
    }
}

impl StudentForm {
    /// The form pre-populated with `student`'s values.
    pub fn from_student(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            middle_name: student.middle_name.clone().unwrap_or_default(),
            last_name: student.last_name.clone(),
            date_of_birth: Some(instant_to_date(student.date_of_birth)),
            gender: Some(student.gender),
            course: student.course.clone(),
            year_level: Some(student.year_level),
        }
    }

    pub fn set(&mut self, edit: FormField) {
        match edit {
            FormField::FirstName(v) => self.first_name = v,
            FormField::MiddleName(v) => self.middle_name = v,
            FormField::LastName(v) => self.last_name = v,
            FormField::DateOfBirth(v) => self.date_of_birth = v,
            FormField::Gender(v) => self.gender = v,
            FormField::Course(v) => self.course = v,
            FormField::YearLevel(v) => self.year_level = v,
        }
    }

    /// Required-field check, then translation to a request payload.
    ///
    /// Every field is sent, including an empty middle name, so that an update replaces all
    /// editable values and a cleared middle name is removed from the record.
    pub fn to_input(&self) -> Result<StudentInput, ValidationErrors> {
        let mut missing = Vec::new();
        let mut require = |field, present: bool| {
            if !present {
                missing.push(FieldError::new(field, ViolationKind::Required));
            }
        };
        require(StudentField::FirstName, !self.first_name.trim().is_empty());
        require(StudentField::LastName, !self.last_name.trim().is_empty());
        require(StudentField::DateOfBirth, self.date_of_birth.is_some());
        require(StudentField::Gender, self.gender.is_some());
        require(StudentField::Course, !self.course.trim().is_empty());
        require(StudentField::YearLevel, self.year_level.is_some());

        match (self.date_of_birth, self.gender, self.year_level) {
            (Some(date), Some(gender), Some(year_level)) if missing.is_empty() => {
                Ok(StudentInput::default()
                    .first_name(&self.first_name)
                    .middle_name(&self.middle_name)
                    .last_name(&self.last_name)
                    .date_of_birth(date_to_instant(date))
                    .gender(gender)
                    .course(&self.course)
                    .year_level(i64::from(year_level)))
            }
            _ => Err(ValidationErrors(missing)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentId;
    use chrono::TimeZone;

    #[test]
    fn test_date_boundary_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2000, 5, 1).unwrap();
        let instant = date_to_instant(date);
        assert_eq!(instant, Utc.with_ymd_and_hms(2000, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(instant_to_date(instant), date);
    }

    #[test]
    fn test_blank_form_defaults_gender_and_reports_required() {
        let form = StudentForm::default();
        assert_eq!(form.gender, Some(Gender::Male));

        let errors = form.to_input().unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                StudentField::FirstName,
                StudentField::LastName,
                StudentField::DateOfBirth,
                StudentField::Course,
                StudentField::YearLevel,
            ]
        );
    }

    #[test]
    fn test_edit_round_trip_keeps_values() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let student = Student {
            id: StudentId(1),
            first_name: "Ana".into(),
            last_name: "Cruz".into(),
            middle_name: Some("Reyes".into()),
            date_of_birth: Utc.with_ymd_and_hms(2000, 5, 1, 0, 0, 0).unwrap(),
            gender: Gender::Female,
            course: "CS".into(),
            year_level: 2,
            created_at: at,
            updated_at: at,
        };

        let mut form = StudentForm::from_student(&student);
        assert_eq!(form.date_of_birth, NaiveDate::from_ymd_opt(2000, 5, 1));
        form.set(FormField::MiddleName(String::new()));

        let input = form.to_input().unwrap();
        assert_eq!(input.middle_name.as_deref(), Some(""));
        assert_eq!(input.gender.as_deref(), Some("Female"));
        assert_eq!(input.year_level, Some(2.into()));
        assert_eq!(input.date_of_birth.as_deref(), Some("2000-05-01T00:00:00Z"));
    }
}
