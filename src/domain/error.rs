//! Engine error types.
//!
//! Every failure mode the dispatcher can hit is converted to a well-formed
//! JSON error response; nothing here is allowed to crash the host process.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to HTTP clients by the mock engine.
#[derive(Debug, Error)]
pub enum MockError {
    /// Request body failed required/type checks. The store is untouched.
    #[error("Request body validation failed")]
    Validation { errors: Vec<FieldError> },

    /// Record never existed or its id is tombstoned.
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },

    /// Unexpected failure during generation or dispatch.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// One field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: &str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.to_string(),
        }
    }
}

impl MockError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The `{message, code, details}` body shape served to clients.
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "message": self.to_string(),
            "code": self.code(),
        });
        if let Self::Validation { errors } = self {
            body["details"] = serde_json::json!({ "errors": errors });
        }
        body
    }
}
