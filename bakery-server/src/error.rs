//! Unified service-layer error type
//!
//! `ServiceError` bridges storage and gateway failures to the API-layer
//! `AppError`, so services can use `?` without hand-written `map_err` at
//! every call site.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::StoreError;
use crate::gateway::GatewayError;

/// Service-layer error
///
/// - `Store`: persistence failure (logged, mapped to `InternalError`)
/// - `Gateway`: payment provider failure (logged, mapped to 502)
/// - `App`: business-rule error, passed through to the client
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(StoreError::UniqueViolation(constraint)) => {
                tracing::warn!(constraint = %constraint, "Unhandled unique violation");
                AppError::conflict("Resource already exists")
            }
            ServiceError::Store(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
            ServiceError::Gateway(GatewayError::Timeout) => {
                tracing::error!("Payment gateway timed out");
                AppError::new(ErrorCode::GatewayTimeout)
            }
            ServiceError::Gateway(gw_err) => {
                tracing::error!(error = %gw_err, "Payment gateway error");
                AppError::new(ErrorCode::GatewayError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
