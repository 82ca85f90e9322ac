//! HTTP error responses.

use crate::error::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON body of every 4xx/5xx response that has a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self::at(status, message, Utc::now())
    }

    /// Build with an explicit timestamp.
    ///
    /// A blank message is replaced by the canonical reason phrase of `status`.
    pub fn at(status: StatusCode, message: &str, timestamp: DateTime<Utc>) -> Self {
        let message = match message.trim() {
            "" => status.canonical_reason().unwrap_or_default(),
            trimmed => trimmed,
        };
        Self {
            code: status.as_u16(),
            message: message.to_string(),
            timestamp,
        }
    }
}

/// Terminal response for a failed request. `body` is `None` for the
/// deliberately empty 404 and 304 answers.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: Option<ErrorResponse>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: Some(ErrorResponse::new(status, message)),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Option<&ErrorResponse> {
        self.body.as_ref()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound => Self::empty(StatusCode::NOT_FOUND),
            Error::NotModified => Self::empty(StatusCode::NOT_MODIFIED),
            Error::InvalidArgument(reason) => Self::bad_request(&reason),
            Error::Internal(message) => Self::internal(&message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}
