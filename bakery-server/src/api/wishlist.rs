//! Wishlist API

use axum::{
    Extension, Router,
    extract::State,
    routing::{delete, get},
};
use shared::error::{ApiResponse, AppError};
use shared::models::{WishlistAdd, WishlistEntry};

use crate::auth::CurrentCustomer;
use crate::services::wishlist;
use crate::state::AppState;
use super::extract::{AppJson, AppPath};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(list).post(add))
        .route("/wishlist/{menu_id}", delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
) -> Result<ApiResponse<Vec<WishlistEntry>>, AppError> {
    Ok(ApiResponse::success(wishlist::list(&state, &who).await?))
}

async fn add(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppJson(req): AppJson<WishlistAdd>,
) -> Result<ApiResponse<WishlistEntry>, AppError> {
    Ok(ApiResponse::created(
        "Added to wishlist",
        wishlist::add(&state, &who, req).await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(menu_id): AppPath<i64>,
) -> Result<ApiResponse<()>, AppError> {
    wishlist::remove(&state, &who, menu_id).await?;
    Ok(ApiResponse::ok("Removed from wishlist"))
}
