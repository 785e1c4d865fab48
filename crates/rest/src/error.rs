//! Error types for the VacQ REST API.
//!
//! Every hospital endpoint answers failures with a `{ "success": false }`
//! envelope. Most failures collapse to that bare body with HTTP 400; a
//! [`RestError::Reported`] error carries its own status, message and error
//! text for endpoints that describe the failure to the client.
//!
//! # Error Mapping
//!
//! | Storage Error | REST Error | HTTP Status |
//! |--------------|------------|-------------|
//! | ResourceError::NotFound | NotFound | 400 |
//! | ResourceError::AlreadyExists | BadRequest | 400 |
//! | ValidationError | BadRequest | 400 |
//! | QueryError | BadRequest | 400 |
//! | TransactionError | Internal | 400 |
//! | BackendError | Internal | 400 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::warn;
use vacq_persistence::error::{ResourceError, StorageError, ValidationError};

use crate::query::ListQueryError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// The addressed document does not exist.
    NotFound {
        /// The collection (e.g., "hospitals").
        collection: String,
        /// The document ID.
        id: String,
    },

    /// The request is malformed or fails validation.
    BadRequest {
        /// Error message.
        message: String,
    },

    /// The storage layer failed.
    Internal {
        /// Error message.
        message: String,
    },

    /// A failure reported to the client with an explicit status and message.
    Reported {
        /// HTTP status to answer with.
        status: StatusCode,
        /// Message returned in the `message` field.
        message: String,
        /// Optional error text returned in the `error` field.
        error: Option<String>,
    },
}

impl RestError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a reported error without error text.
    pub fn reported(status: StatusCode, message: impl Into<String>) -> Self {
        RestError::Reported {
            status,
            message: message.into(),
            error: None,
        }
    }

    /// Returns the HTTP status this error is answered with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Reported { status, .. } => *status,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { collection, id } => {
                write!(f, "Document not found: {}/{}", collection, id)
            }
            RestError::BadRequest { message } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
            RestError::Reported { message, error, .. } => match error {
                Some(error) => write!(f, "{}: {}", message, error),
                None => write!(f, "{}", message),
            },
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(status = %status, error = %self, "Request failed");

        let body = match self {
            RestError::Reported {
                message,
                error: Some(error),
                ..
            } => json!({ "success": false, "message": message, "error": error }),
            RestError::Reported { message, .. } => {
                json!({ "success": false, "message": message })
            }
            _ => json!({ "success": false }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(ResourceError::NotFound { collection, id }) => {
                RestError::NotFound { collection, id }
            }
            StorageError::Resource(e @ ResourceError::AlreadyExists { .. }) => {
                RestError::BadRequest {
                    message: e.to_string(),
                }
            }
            StorageError::Validation(e) => RestError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Query(e) => RestError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Transaction(e) => RestError::Internal {
                message: e.to_string(),
            },
            StorageError::Backend(e) => RestError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<ListQueryError> for RestError {
    fn from(err: ListQueryError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;
