//! Error types for web handlers.
//!
//! This module defines the error type that bridges domain and store errors
//! to HTTP responses, implementing Axum's `IntoResponse` trait.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use loket_runtime::StoreError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Carries a status, a user-facing message, a machine-readable code and,
/// optionally, a route the client should navigate to (sent both as a
/// `Location` header and as `next` in the JSON body).
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<EventView>, AppError> {
///     let event = catalog.event(&id).ok_or_else(|| AppError::not_found("Event", &id))?;
///     Ok(Json(event.into()))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Route the client should go to next
    location: Option<String>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            location: None,
            source: None,
        }
    }

    /// Attach a source error (logged for 5xx responses).
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach a navigation hint, sent as the `Location` header.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Navigation hint, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 "login required" error pointing at the login route.
    #[must_use]
    pub fn login_required(login_route: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "Please log in to continue".to_string(),
            "LOGIN_REQUIRED".to_string(),
        )
        .with_location(login_route)
    }

    /// Create a 402 Payment Required error.
    #[must_use]
    pub fn payment_failed(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYMENT_REQUIRED,
            message.into(),
            "PAYMENT_FAILED".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 408 Request Timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::REQUEST_TIMEOUT,
            message.into(),
            "TIMEOUT".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
    /// Route to navigate to.
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        } else {
            tracing::debug!(status = %self.status, code = %self.code, "Request rejected");
        }

        let location = self
            .location
            .as_deref()
            .and_then(|l| HeaderValue::from_str(l).ok());

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            next: self.location,
        };

        let mut response = (self.status, Json(body)).into_response();
        if let Some(location) = location {
            response.headers_mut().insert(header::LOCATION, location);
        }
        response
    }
}

/// Map store failures onto HTTP semantics.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout => Self::timeout("The request took too long to complete"),
            StoreError::ShutdownInProgress | StoreError::ChannelClosed => {
                Self::unavailable("Service is shutting down")
            },
            other => Self::internal("An internal error occurred").with_source(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Event", "evt-404");
        assert_eq!(err.to_string(), "[NOT_FOUND] Event with id evt-404 not found");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation() {
        let err = AppError::validation("Passwords do not match");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_login_required_sets_location_header() {
        let response = AppError::login_required("/login").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::LOCATION).map(HeaderValue::as_bytes),
            Some(&b"/login"[..])
        );
    }

    #[test]
    fn test_store_errors_map_to_status() {
        assert_eq!(AppError::from(StoreError::Timeout).status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            AppError::from(StoreError::ShutdownInProgress).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        let internal = AppError::from(StoreError::ShutdownTimeout(2));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let source = std::error::Error::source(&internal).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Shutdown timed out with 2 effects still running"));
    }
}
