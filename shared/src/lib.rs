//! Shared types for the bakery backend
//!
//! Domain models with their status state machines, the unified error-code
//! system, the JSON response envelope and small time helpers.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use response::{PageMeta, PageParams};
pub use serde::{Deserialize, Serialize};
