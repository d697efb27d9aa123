//! Cart API

use axum::{
    Extension, Router,
    extract::State,
    routing::{get, patch},
};
use shared::error::{ApiResponse, AppError};
use shared::models::{CartAdd, CartLine, CartUpdate};

use crate::auth::CurrentCustomer;
use crate::services::cart;
use crate::state::AppState;
use super::extract::{AppJson, AppPath};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(list).post(add).delete(clear))
        .route("/cart/{id}", patch(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
) -> Result<ApiResponse<Vec<CartLine>>, AppError> {
    Ok(ApiResponse::success(cart::list(&state, &who).await?))
}

async fn add(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppJson(req): AppJson<CartAdd>,
) -> Result<ApiResponse<CartLine>, AppError> {
    Ok(ApiResponse::created("Added to cart", cart::add(&state, &who, req).await?))
}

async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<CartUpdate>,
) -> Result<ApiResponse<CartLine>, AppError> {
    Ok(ApiResponse::success(cart::update(&state, &who, id, req).await?))
}

async fn remove(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<()>, AppError> {
    cart::remove(&state, &who, id).await?;
    Ok(ApiResponse::ok("Removed from cart"))
}

async fn clear(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
) -> Result<ApiResponse<u64>, AppError> {
    let removed = cart::clear(&state, &who).await?;
    Ok(ApiResponse::success_with_message("Cart cleared", removed))
}
