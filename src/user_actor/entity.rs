//! [`ActorEntity`] implementation for the read-only [`User`] directory.
//!
//! Users are registered once (when seeding) and never edited: the update payload is
//! [`Infallible`], so an update request cannot even be constructed.

use super::UserError;
use crate::context::RecordsContext;
use crate::model::{User, UserId, UserRegistration};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::convert::Infallible;

fn required(field: &str, value: String) -> Result<String, UserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserError::ValidationError(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserRegistration;
    type Update = Infallible;
    type Context = RecordsContext;
    type Error = UserError;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn from_create_params(id: UserId, params: UserRegistration) -> Result<Self, UserError> {
        Ok(Self {
            id,
            first_name: required("firstName", params.first_name)?,
            middle_name: params
                .middle_name
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            last_name: required("lastName", params.last_name)?,
            email: required("email", params.email)?,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        })
    }

    async fn on_create(&mut self, ctx: &RecordsContext) -> Result<(), UserError> {
        self.created_at = ctx.now();
        Ok(())
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &RecordsContext) -> Result<(), UserError> {
        match update {}
    }
}
