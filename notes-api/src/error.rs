//! Error Types for the Notes API
//!
//! This module defines error handling for the API layer, including:
//! - ErrorCode enum with the stable wire codes clients branch on
//! - ApiError struct carrying a code plus a server-side message
//! - IntoResponse implementation for Axum HTTP responses
//!
//! Errors are rendered as `{"error": "<code>"}`. The message is logged,
//! never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notes_core::{StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConfigError;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Note content is missing or blank after trimming
    ContentRequired,

    /// Update request carried neither `name` nor `content`
    NoFields,

    /// Request body is not valid JSON
    InvalidJson,

    // ========================================================================
    // Transport Errors (405, 413)
    // ========================================================================
    /// The path exists but does not accept this method
    MethodNotAllowed,

    /// Request body exceeds the accepted size
    PayloadTooLarge,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// No note with the requested id, or no such route
    NotFound,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Storage operation failed
    DatabaseError,

    /// Any other server-side failure
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ContentRequired | ErrorCode::NoFields | ErrorCode::InvalidJson => {
                StatusCode::BAD_REQUEST
            }

            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            ErrorCode::NotFound => StatusCode::NOT_FOUND,

            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ContentRequired => "Note content is required",
            ErrorCode::NoFields => "No fields to update",
            ErrorCode::InvalidJson => "Request body is not valid JSON",
            ErrorCode::MethodNotAllowed => "Method not allowed",
            ErrorCode::PayloadTooLarge => "Request body too large",
            ErrorCode::NotFound => "Note not found",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }

    /// The wire form of the code, e.g. `content_required`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ContentRequired => "content_required",
            ErrorCode::NoFields => "no_fields",
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::MethodNotAllowed => "method_not_allowed",
            ErrorCode::PayloadTooLarge => "payload_too_large",
            ErrorCode::NotFound => "not_found",
            ErrorCode::DatabaseError => "database_error",
            ErrorCode::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Error returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Server-side description, logged but not serialized
    pub message: String,
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: ErrorCode,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    pub fn content_required() -> Self {
        Self::from_code(ErrorCode::ContentRequired)
    }

    pub fn no_fields() -> Self {
        Self::from_code(ErrorCode::NoFields)
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidJson, message)
    }

    /// Create a NotFound error for a note id (or an unparseable id segment).
    pub fn note_not_found(note_id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::NotFound, format!("Note {} not found", note_id))
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "Request failed");
        } else {
            tracing::debug!(code = %self.code, message = %self.message, "Request rejected");
        }
        (status, Json(ErrorBody { error: self.code })).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::ContentRequired => ApiError::content_required(),
            ValidationError::NoFields => ApiError::no_fields(),
        }
    }
}

/// Every storage failure becomes a generic `database_error`; the detail is
/// kept in the message for the log line only.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::database_error(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_json(format!("Invalid JSON: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
