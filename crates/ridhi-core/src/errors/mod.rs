// ABOUTME: Unified error type with error codes mapped to HTTP statuses
// ABOUTME: Provides AppError, ErrorCode, ErrorResponse and the axum IntoResponse integration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # Unified Error Handling System
//!
//! Every fallible operation in the server returns [`AppResult`]. Route
//! handlers convert an [`AppError`] into a JSON body of the shape
//!
//! ```json
//! { "success": false, "error": "Message is required", "code": "MISSING_REQUIRED_FIELD" }
//! ```
//!
//! Provider failures are deliberately *not* represented here: LLM adapters
//! fail soft and report failure inside their result value instead.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Message returned to clients in place of internal error details
pub const GENERIC_INTERNAL_MESSAGE: &str = "An internal server error occurred";

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication
    /// Credentials are missing
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    /// Credentials are present but invalid
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    /// Credentials have expired
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired,

    // Validation
    /// Generic invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A required field is missing from the request
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// A value is outside the accepted range (e.g. upload too large)
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange,

    // Resources
    /// The requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    // External services
    /// An upstream API returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// An upstream API could not be reached or returned 5xx
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable,
    /// An upstream API rejected our credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed,
    /// An upstream API rate limited us
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited,
    /// An upstream API did not answer within the configured timeout
    #[serde(rename = "EXTERNAL_TIMEOUT")]
    ExternalTimeout,

    // Configuration
    /// Configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,

    // Internal
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
    /// Document store failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Blob store failure
    #[serde(rename = "STORAGE_ERROR")]
    StorageError,
    /// Data could not be (de)serialized
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,
            Self::AuthRequired | Self::AuthInvalid => 401,
            Self::AuthExpired => 403,
            Self::ResourceNotFound => 404,
            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ExternalAuthFailed => 502,
            Self::ExternalRateLimited => 503,
            Self::ExternalTimeout => 504,
            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ExternalTimeout => "An external service did not respond in time",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => GENERIC_INTERNAL_MESSAGE,
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether a retry of the failed upstream call may succeed
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            Self::ExternalServiceUnavailable | Self::ExternalRateLimited | Self::ExternalTimeout
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional detail string surfaced to clients for non-internal errors
    pub details: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach a detail string
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Re-label an error with a route-level message, keeping the original
    /// message as details and the original code.
    ///
    /// Used by handlers to produce `{"error": "Failed to fetch history", "details": "..."}`.
    #[must_use]
    pub fn context(self, message: impl Into<String>) -> Self {
        let details = self.message;
        Self {
            code: self.code,
            message: message.into(),
            details: Some(details),
            source: self.source,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether a retry of the failed upstream call may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.code.is_transient()
    }
}

/// Convenience constructors for common errors
impl AppError {
    /// Invalid authentication
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Authentication token has expired")
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field(s) missing; the message is shown to the client verbatim
    #[must_use]
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Document store error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Blob store error
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service unreachable or failing with 5xx
    #[must_use]
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service timed out
    #[must_use]
    pub fn external_timeout(service: impl Into<String>, seconds: u64) -> Self {
        Self::new(
            ErrorCode::ExternalTimeout,
            format!("{}: no response within {seconds}s", service.into()),
        )
    }

    /// Map an upstream HTTP status to an error with the right transient-ness
    #[must_use]
    pub fn from_upstream_status(service: &str, status: u16, message: &str) -> Self {
        let code = match status {
            401 | 403 => ErrorCode::ExternalAuthFailed,
            404 => ErrorCode::ResourceNotFound,
            429 => ErrorCode::ExternalRateLimited,
            500..=599 => ErrorCode::ExternalServiceUnavailable,
            _ => ErrorCode::ExternalServiceError,
        };
        Self::new(code, format!("{service} API error ({status}): {message}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        // Request URLs may carry API keys in the query string
        let error = error.without_url();
        let code = if error.is_timeout() {
            ErrorCode::ExternalTimeout
        } else if error.is_connect() || error.is_request() {
            ErrorCode::ExternalServiceUnavailable
        } else {
            ErrorCode::ExternalServiceError
        };
        Self::new(code, format!("HTTP request failed: {error}")).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Client-facing message
    pub error: String,
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Additional detail, omitted for internal errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        // Internal failures never leak their message or details
        if error.code == ErrorCode::InternalError {
            return Self {
                success: false,
                error: GENERIC_INTERNAL_MESSAGE.to_owned(),
                code: error.code,
                details: None,
            };
        }
        Self {
            success: false,
            error: error.message,
            code: error.code,
            details: error.details,
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                code = ?self.code,
                message = %self.message,
                details = self.details.as_deref().unwrap_or(""),
                "Request failed"
            );
        } else {
            tracing::debug!(code = ?self.code, message = %self.message, "Request rejected");
        }

        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
        assert_eq!(ErrorCode::ExternalTimeout.http_status(), 504);
    }

    #[test]
    fn test_transient_codes() {
        assert!(AppError::external_timeout("Gemini", 30).is_transient());
        assert!(AppError::from_upstream_status("DeepSeek", 503, "overloaded").is_transient());
        assert!(AppError::from_upstream_status("DeepSeek", 429, "slow down").is_transient());
        assert!(!AppError::from_upstream_status("DeepSeek", 400, "bad").is_transient());
        assert!(!AppError::from_upstream_status("Gemini", 401, "key").is_transient());
    }

    #[test]
    fn test_context_keeps_original_message_as_details() {
        let error = AppError::database("firestore unreachable").context("Failed to fetch history");
        assert_eq!(error.code, ErrorCode::DatabaseError);
        assert_eq!(error.message, "Failed to fetch history");
        assert_eq!(error.details.as_deref(), Some("firestore unreachable"));
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let response = ErrorResponse::from(
            AppError::internal("task panicked at src/orchestrator.rs").with_details("stack"),
        );
        assert_eq!(response.error, GENERIC_INTERNAL_MESSAGE);
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::from(AppError::missing_field("Message is required"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Message is required");
        assert_eq!(json["code"], "MISSING_REQUIRED_FIELD");
        assert!(json.get("details").is_none());
    }
}
