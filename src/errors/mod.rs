//! Error handling module for the reservation backend.
//!
//! Provides the error taxonomy shared by the store, service and handler layers,
//! together with its mapping to HTTP status codes and the JSON error body.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A required field is missing or falsy; carries the field name.
    MissingField(String),
    /// No reservation with the given id
    NotFound(String),
    /// Underlying document store failure
    Store(String),
    /// Request body or stored document is not a valid reservation document
    Malformed(String),
    /// Anything else
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Malformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::MissingField(field) => format!("{} is a required field", field),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Store(msg) => msg.clone(),
            AppError::Malformed(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Not-found error for a reservation id.
    pub fn reservation_not_found(id: &str) -> Self {
        AppError::NotFound(format!("Reservation {} not found", id))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Store(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Malformed(format!("JSON error: {}", err))
    }
}

/// Error response body: `{message, error?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    /// Generic message plus the underlying error text.
    pub fn with_cause(message: impl Into<String>, cause: &AppError) -> Self {
        Self {
            message: message.into(),
            error: Some(cause.message()),
        }
    }
}
