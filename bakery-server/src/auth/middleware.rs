//! Authentication middleware
//!
//! [`require_auth`] validates `Authorization: Bearer <token>` and inserts a
//! [`CurrentCustomer`] into the request extensions. [`require_admin`] must be
//! layered inside it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use super::{CurrentCustomer, JwtError, JwtService};
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => return Err(AppError::not_authenticated()),
    };

    match state.jwt.validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentCustomer::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(error = %e, uri = %req.uri(), "Authentication failed");
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let customer = req
        .extensions()
        .get::<CurrentCustomer>()
        .ok_or_else(AppError::not_authenticated)?;

    if !customer.is_admin() {
        tracing::warn!(
            customer_id = customer.id,
            uri = %req.uri(),
            "Admin route refused"
        );
        return Err(AppError::admin_required());
    }

    Ok(next.run(req).await)
}
