//! Request extractors that reject with [`AppError`]
//!
//! axum's own `Json`, `Path` and `Query` answer a bad request with a plain
//! text body. These wrappers keep the JSON envelope and answer 400
//! `InvalidRequest` instead.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::Json;
use http::request::Parts;
use serde::de::DeserializeOwned;
use shared::error::AppError;

fn rejected(part: &'static str, reason: String) -> AppError {
    tracing::debug!(part, %reason, "Request rejected by extractor");
    AppError::invalid_request(format!("Invalid request {part}"))
        .with_detail("part", part)
        .with_detail("reason", reason)
}

/// JSON body
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| AppJson(value))
            .map_err(|e| rejected("body", e.body_text()))
    }
}

/// Path parameters
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| AppPath(value))
            .map_err(|e| rejected("path", e.body_text()))
    }
}

/// Query string
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| AppQuery(value))
            .map_err(|e| rejected("query", e.body_text()))
    }
}
