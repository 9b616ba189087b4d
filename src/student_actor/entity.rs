//! [`ActorEntity`] implementation for [`Student`].
//!
//! Create and update both run the full schema: `from_create_params` validates the input,
//! `on_update` validates the input merged over the stored record. The timestamps come
//! from the injected [`RecordsContext`] clock.

use super::StudentError;
use crate::context::RecordsContext;
use crate::model::{Student, StudentId, StudentInput};
use crate::schema::{validate, ValidatedStudent};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

impl Student {
    fn apply(&mut self, valid: ValidatedStudent) {
        self.first_name = valid.first_name;
        self.last_name = valid.last_name;
        self.middle_name = valid.middle_name;
        self.date_of_birth = valid.date_of_birth;
        self.gender = valid.gender;
        self.course = valid.course;
        self.year_level = valid.year_level;
    }
}

#[async_trait]
impl ActorEntity for Student {
    type Id = StudentId;
    type Create = StudentInput;
    type Update = StudentInput;
    type Context = RecordsContext;
    type Error = StudentError;

    fn id(&self) -> &StudentId {
        &self.id
    }

    /// Builds the record from a validated input. Timestamps are stamped in `on_create`.
    fn from_create_params(id: StudentId, params: StudentInput) -> Result<Self, StudentError> {
        let valid = validate(&params)?;
        Ok(Self {
            id,
            first_name: valid.first_name,
            last_name: valid.last_name,
            middle_name: valid.middle_name,
            date_of_birth: valid.date_of_birth,
            gender: valid.gender,
            course: valid.course,
            year_level: valid.year_level,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        })
    }

    async fn on_create(&mut self, ctx: &RecordsContext) -> Result<(), StudentError> {
        let now = ctx.now();
        self.created_at = now;
        self.updated_at = now;
        Ok(())
    }

    /// Partial update: fields absent from `update` keep their stored values, and the merged
    /// record must pass the schema as a whole.
    async fn on_update(
        &mut self,
        update: StudentInput,
        ctx: &RecordsContext,
    ) -> Result<(), StudentError> {
        let valid = validate(&update.merged_over(self))?;
        self.apply(valid);
        self.updated_at = ctx.now_after(self.updated_at);
        Ok(())
    }
}
