// ABOUTME: Unified error types for the weatherdash backend with stable error codes
// ABOUTME: Maps error codes to HTTP statuses and renders client-safe JSON error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the weatherdash crates returns [`AppResult`].
//! An [`AppError`] carries a stable [`ErrorCode`], a message safe to show to
//! clients, and an optional source chain that is only ever logged.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request payload or parameter is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field is absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Body could not be parsed
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // Resource Management (4000-4999)
    /// Requested entity does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    /// Upstream service returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Upstream service could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Upstream rejected our credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Upstream rate limited us
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// Generic configuration failure
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// A required setting is not present
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// A setting is present but unparseable
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// JSON encoding or decoding failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => 400,
            Self::ResourceNotFound => 404,
            Self::ExternalServiceError | Self::ExternalAuthFailed => 502,
            Self::ExternalServiceUnavailable | Self::ExternalRateLimited => 503,
            Self::ConfigError
            | Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// True for errors caused by an upstream collaborator
    #[must_use]
    pub const fn is_external(self) -> bool {
        matches!(
            self,
            Self::ExternalServiceError
                | Self::ExternalServiceUnavailable
                | Self::ExternalAuthFailed
                | Self::ExternalRateLimited
        )
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Structured details safe to return to the client
    pub details: serde_json::Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Add a request ID
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach client-safe details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable error code
    pub code: ErrorCode,
    /// Client-safe message
    pub message: String,
    /// Correlation id when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Extra structured details
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                request_id: error.request_id,
                details: error.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration is absent
    pub fn config_missing(setting: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("Required configuration {setting} is not set"),
        )
    }

    /// Configuration value could not be parsed
    pub fn config_invalid(setting: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalid,
            format!("Invalid value '{value}' for {setting}"),
        )
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service unreachable
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        let message = error.to_string();
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, message)
                .with_details(serde_json::json!({ "source": source.to_string() })),
            None => Self::new(ErrorCode::InternalError, message),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("JSON processing failed: {error}"),
        )
        .with_source(error)
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let service = error
            .url()
            .and_then(|url| url.host_str().map(ToOwned::to_owned))
            .unwrap_or_else(|| "upstream".to_owned());
        let code = if error.is_timeout() || error.is_connect() {
            ErrorCode::ExternalServiceUnavailable
        } else {
            ErrorCode::ExternalServiceError
        };
        Self::new(code, format!("{service}: request failed")).with_source(error)
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ErrorResponse};
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                tracing::error!(
                    code = ?self.code,
                    message = %self.message,
                    source = ?self.source,
                    "request failed"
                );
            } else {
                tracing::debug!(code = ?self.code, message = %self.message, "request rejected");
            }
            (status, Json(ErrorResponse::from(self))).into_response()
        }
    }
}
