//! # Student Client
//!
//! Typed remote-call wrapper over a [`Transport`]: the same operations as the gateway, with
//! every failure folded into [`RemoteError`].

use super::error::RemoteError;
use super::transport::Transport;
use crate::gateway::{GatewayRequest, GatewayResponse};
use crate::model::{Student, StudentId, StudentInput, StudentOrder, User};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

async fn call<R: DeserializeOwned>(
    transport: &dyn Transport,
    request: GatewayRequest,
) -> Result<R, RemoteError> {
    match transport.send(request).await? {
        GatewayResponse::Ok { data } => serde_json::from_value(data)
            .map_err(|e| RemoteError::Transport(format!("undecodable response: {e}"))),
        GatewayResponse::Error { error } => Err(error.into()),
    }
}

#[derive(Clone)]
pub struct StudentClient {
    transport: Arc<dyn Transport>,
}

impl StudentClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self, order: StudentOrder) -> Result<Vec<Student>, RemoteError> {
        debug!("Sending request");
        call(self.transport.as_ref(), GatewayRequest::ListStudents { order }).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: StudentId) -> Result<Option<Student>, RemoteError> {
        debug!("Sending request");
        call(self.transport.as_ref(), GatewayRequest::GetStudent { id }).await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: StudentInput) -> Result<Student, RemoteError> {
        debug!("Sending request");
        call(self.transport.as_ref(), GatewayRequest::CreateStudent { input }).await
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: StudentId, input: StudentInput) -> Result<Student, RemoteError> {
        debug!("Sending request");
        call(
            self.transport.as_ref(),
            GatewayRequest::UpdateStudent { id, input },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: StudentId) -> Result<(), RemoteError> {
        debug!("Sending request");
        call(self.transport.as_ref(), GatewayRequest::DeleteStudent { id }).await
    }
}

/// Read-only client for the user directory.
#[derive(Clone)]
pub struct UserDirectoryClient {
    transport: Arc<dyn Transport>,
}

impl UserDirectoryClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, RemoteError> {
        debug!("Sending request");
        call(self.transport.as_ref(), GatewayRequest::ListUsers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::TransportError;
    use crate::gateway::{ErrorDoc, ErrorKind};
    use crate::schema::{FieldError, StudentField, ViolationKind};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers with canned results and records what was sent.
    struct ScriptedTransport {
        answers: Mutex<Vec<Result<GatewayResponse, TransportError>>>,
        sent: Mutex<Vec<GatewayRequest>>,
    }

    impl ScriptedTransport {
        fn new(answers: Vec<Result<GatewayResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into_iter().rev().collect()),
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError> {
            self.sent.lock().unwrap().push(request);
            self.answers
                .lock()
                .unwrap()
                .pop()
                .expect("unexpected request")
        }
    }

    fn error(kind: ErrorKind, detail: &str) -> Result<GatewayResponse, TransportError> {
        Ok(GatewayResponse::Error {
            error: ErrorDoc::new(kind, detail),
        })
    }

    #[tokio::test]
    async fn test_error_documents_map_to_remote_errors() {
        let validation = ErrorDoc {
            kind: ErrorKind::Validation,
            detail: "Validation failed: yearLevel must be at least 1".into(),
            fields: vec![FieldError::new(StudentField::YearLevel, ViolationKind::OutOfRange)],
        };
        let transport = ScriptedTransport::new(vec![
            Ok(GatewayResponse::Error { error: validation }),
            error(ErrorKind::NotFound, "Student not found: student_2"),
            error(ErrorKind::Storage, "disk full"),
            Err(TransportError::Closed),
        ]);
        let client = StudentClient::new(transport.clone());

        let created = client.create(StudentInput::default().year_level(0)).await;
        let Err(RemoteError::Validation(errors)) = created else {
            panic!("expected validation error, got {created:?}");
        };
        assert!(errors.contains(StudentField::YearLevel));

        assert_eq!(
            client.delete(StudentId(2)).await,
            Err(RemoteError::NotFound("Student not found: student_2".into()))
        );
        assert_eq!(
            client
                .update(StudentId(1), StudentInput::default())
                .await
                .unwrap_err(),
            RemoteError::Storage("disk full".into())
        );
        assert_eq!(
            client.list_all(StudentOrder::Insertion).await,
            Err(RemoteError::Transport("gateway closed".into()))
        );

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[1], GatewayRequest::DeleteStudent { id: StudentId(2) });
    }

    #[tokio::test]
    async fn test_undecodable_data_is_a_transport_error() {
        let transport = ScriptedTransport::new(vec![Ok(GatewayResponse::Ok {
            data: json!({"unexpected": true}),
        })]);
        let client = StudentClient::new(transport);

        let result = client.list_all(StudentOrder::Insertion).await;
        assert!(matches!(result, Err(RemoteError::Transport(_))));
    }

    #[tokio::test]
    async fn test_delete_and_missing_get() {
        let transport = ScriptedTransport::new(vec![
            Ok(GatewayResponse::Ok { data: json!(null) }),
            Ok(GatewayResponse::Ok { data: json!(null) }),
        ]);
        let client = StudentClient::new(transport);

        assert_eq!(client.delete(StudentId(1)).await, Ok(()));
        assert_eq!(client.get(StudentId(1)).await, Ok(None));
    }

    #[tokio::test]
    async fn test_list_users() {
        let transport = ScriptedTransport::new(vec![Ok(GatewayResponse::Ok {
            data: json!([{
                "id": "user_1",
                "firstName": "Rosa",
                "lastName": "Diaz",
                "email": "rosa@example.com",
                "createdAt": "2024-02-01T09:30:00Z"
            }]),
        })]);
        let users = UserDirectoryClient::new(transport)
            .list_users()
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].full_name(), "Rosa Diaz");
    }
}
