//! HTTP error boundary.
//!
//! Every failure leaves the server as `{ "errorMessage": "..." }` with a
//! status picked from the domain error. Store failures are logged and
//! replaced by a generic message so backend details never reach clients.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use todo_core::{TodoError, ValidationError};
use tracing::{error, warn};

pub const NOT_FOUND_MESSAGE: &str = "todo does not exist";
pub const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_message: String,
}

#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error_message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl From<TodoError> for ApiErrorResponse {
    fn from(error: TodoError) -> Self {
        match error {
            TodoError::Validation(error) => error.into(),
            TodoError::NotFound(_) => Self::not_found(),
            TodoError::RankExhausted(_) => {
                warn!(%error, "rank space exhausted");
                Self::new(StatusCode::CONFLICT, error.to_string())
            }
            TodoError::Store(error) => {
                error!(%error, "store failure");
                Self::internal()
            }
        }
    }
}
