//! Error types and API response structures

use super::codes::ErrorCode;
use crate::response::PageMeta;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The only error type that reaches the HTTP edge. Services build it from a
/// code plus an optional message override and field-level details.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn too_many_requests() -> Self {
        Self::new(ErrorCode::TooManyRequests)
    }
}

/// Unified API response envelope
///
/// Success: `{message, data?, meta?}`. Failure: `{message, errors?}` where
/// `errors.code` carries the numeric [`ErrorCode`] and any extra details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status used when rendering; not part of the body
    #[serde(skip)]
    pub status: StatusCode,
    /// Human-readable message
    pub message: String,
    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    /// Error code and details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    /// Create a success response with custom message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data: Some(data),
            meta: None,
            errors: None,
        }
    }

    /// 201 Created with data
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success_with_message(message, data)
        }
    }

    /// Success response carrying a page of items
    pub fn paginated(data: T, meta: PageMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::success(data)
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data: None,
            meta: None,
            errors: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        let mut errors = err.details.clone().unwrap_or_default();
        errors.insert("code".to_string(), Value::from(err.code.code()));
        Self {
            status: err.http_status(),
            message: err.message.clone(),
            data: None,
            meta: None,
            errors: Some(errors),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let body = ApiResponse::<()>::error(&self);

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (body.status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "delivery_address")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "delivery_address");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::TableUnavailable).http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::admin_required().http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_found_constructor() {
        let err = AppError::not_found("Customer");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Customer not found");
        assert!(err.details.as_ref().unwrap().contains_key("resource"));
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 7 not found");
        assert_eq!(format!("{}", err), "Order 7 not found");
    }

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::success(42);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "OK");
        assert_eq!(json["data"], 42);
        assert!(json.get("meta").is_none());
        assert!(json.get("errors").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created("Order created", "x");
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[test]
    fn test_paginated_envelope_has_meta() {
        let response = ApiResponse::paginated(vec![1, 2], PageMeta::new(2, 2, 5));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["total"], 5);
        assert_eq!(json["meta"]["total_pages"], 3);
    }

    #[test]
    fn test_error_envelope_carries_code() {
        let err = AppError::new(ErrorCode::InvalidTransition).with_detail("from", "delivered");
        let response = ApiResponse::<()>::error(&err);
        assert_eq!(response.status, StatusCode::CONFLICT);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Status transition not permitted");
        assert_eq!(json["errors"]["code"], 4003);
        assert_eq!(json["errors"]["from"], "delivered");
        assert!(json.get("data").is_none());
    }
}
