//! The gateway service: decodes [`GatewayRequest`]s, runs them against the record actors
//! and encodes the outcome as a [`GatewayResponse`].

use super::api::{ErrorDoc, ErrorKind, GatewayRequest, GatewayResponse};
use crate::clients::{StudentActorClient, UserActorClient};
use crate::student_actor::StudentError;
use crate::user_actor::UserError;
use actor_framework::ActorClient;
use serde::Serialize;
use tracing::{debug, instrument, warn};

impl From<StudentError> for ErrorDoc {
    fn from(e: StudentError) -> Self {
        match e {
            StudentError::Validation(errors) => ErrorDoc {
                kind: ErrorKind::Validation,
                detail: errors.to_string(),
                fields: errors.0,
            },
            StudentError::NotFound(_) => ErrorDoc::new(ErrorKind::NotFound, e.to_string()),
            // An unreachable student actor means the store is unavailable.
            StudentError::Storage(_) | StudentError::ActorCommunicationError(_) => {
                ErrorDoc::new(ErrorKind::Storage, e.to_string())
            }
        }
    }
}

impl From<UserError> for ErrorDoc {
    fn from(e: UserError) -> Self {
        match e {
            UserError::ValidationError(_) => ErrorDoc::new(ErrorKind::Validation, e.to_string()),
            UserError::Storage(_) | UserError::ActorCommunicationError(_) => {
                ErrorDoc::new(ErrorKind::Storage, e.to_string())
            }
        }
    }
}

fn data<T: Serialize>(value: T) -> Result<serde_json::Value, ErrorDoc> {
    serde_json::to_value(value)
        .map_err(|e| ErrorDoc::new(ErrorKind::Storage, format!("unserializable record: {e}")))
}

/// Executes gateway operations against the student and user actors.
#[derive(Clone)]
pub struct GatewayService {
    students: StudentActorClient,
    users: UserActorClient,
}

impl GatewayService {
    pub fn new(students: StudentActorClient, users: UserActorClient) -> Self {
        Self { students, users }
    }

    #[instrument(skip(self, request), fields(op = request.op()))]
    pub async fn handle(&self, request: GatewayRequest) -> GatewayResponse {
        match self.dispatch(request).await {
            Ok(data) => GatewayResponse::Ok { data },
            Err(error) => {
                debug!(kind = ?error.kind, detail = %error.detail, "Request failed");
                GatewayResponse::Error { error }
            }
        }
    }

    /// Decodes one JSON request document and encodes the response document.
    ///
    /// A document that is not a valid request gets a `transport` error back.
    pub async fn handle_json(&self, body: &str) -> Result<String, serde_json::Error> {
        let response = match serde_json::from_str::<GatewayRequest>(body) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "Malformed request document");
                GatewayResponse::Error {
                    error: ErrorDoc::new(ErrorKind::Transport, format!("malformed request: {e}")),
                }
            }
        };
        serde_json::to_string(&response)
    }

    async fn dispatch(&self, request: GatewayRequest) -> Result<serde_json::Value, ErrorDoc> {
        match request {
            GatewayRequest::ListStudents { order } => {
                let mut students = self.students.list().await?;
                order.apply(&mut students);
                data(students)
            }
            GatewayRequest::GetStudent { id } => data(self.students.get(id).await?),
            GatewayRequest::CreateStudent { input } => {
                data(self.students.create_student(input).await?)
            }
            GatewayRequest::UpdateStudent { id, input } => {
                data(self.students.update_student(id, input).await?)
            }
            GatewayRequest::DeleteStudent { id } => data(self.students.delete(id).await?),
            GatewayRequest::ListUsers => data(self.users.list().await?),
        }
    }
}
