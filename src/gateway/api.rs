//! Wire documents exchanged between the resource clients and the gateway.
//!
//! Requests are tagged by `op`:
//!
//! ```json
//! {"op": "update_student", "id": "student_1", "input": {"yearLevel": 3}}
//! ```
//!
//! Responses are tagged by `status`:
//!
//! ```json
//! {"status": "ok", "data": {...}}
//! {"status": "error", "error": {"kind": "validation", "detail": "...", "fields": [...]}}
//! ```

use crate::model::{StudentId, StudentInput, StudentOrder};
use crate::schema::FieldError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GatewayRequest {
    ListStudents {
        #[serde(default)]
        order: StudentOrder,
    },
    GetStudent {
        id: StudentId,
    },
    CreateStudent {
        input: StudentInput,
    },
    UpdateStudent {
        id: StudentId,
        input: StudentInput,
    },
    DeleteStudent {
        id: StudentId,
    },
    ListUsers,
}

impl GatewayRequest {
    /// The `op` tag, for logging.
    pub fn op(&self) -> &'static str {
        match self {
            GatewayRequest::ListStudents { .. } => "list_students",
            GatewayRequest::GetStudent { .. } => "get_student",
            GatewayRequest::CreateStudent { .. } => "create_student",
            GatewayRequest::UpdateStudent { .. } => "update_student",
            GatewayRequest::DeleteStudent { .. } => "delete_student",
            GatewayRequest::ListUsers => "list_users",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GatewayResponse {
    Ok { data: serde_json::Value },
    Error { error: ErrorDoc },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDoc {
    pub kind: ErrorKind,
    pub detail: String,
    /// Field-level violations; only present for `validation`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorDoc {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            fields: Vec::new(),
        }
    }
}
