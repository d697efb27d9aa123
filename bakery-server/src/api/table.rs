//! Dining Table API

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, patch, post},
};
use shared::error::{ApiResponse, AppError};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::auth::require_admin;
use crate::services::table;
use crate::state::AppState;
use super::extract::{AppJson, AppPath};

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/tables", get(list))
        .route("/tables/{id}", get(get_by_id))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/tables", post(create))
        .route("/tables/{id}", patch(update).delete(delete))
        .layer(middleware::from_fn(require_admin))
}

/// GET /tables
async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<DiningTable>>, AppError> {
    Ok(ApiResponse::success(table::list(&state).await?))
}

/// GET /tables/{id}
async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<DiningTable>, AppError> {
    Ok(ApiResponse::success(table::get(&state, id).await?))
}

/// POST /tables
async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<DiningTableCreate>,
) -> Result<ApiResponse<DiningTable>, AppError> {
    Ok(ApiResponse::created("Table created", table::create(&state, req).await?))
}

/// PATCH /tables/{id}
async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<DiningTableUpdate>,
) -> Result<ApiResponse<DiningTable>, AppError> {
    Ok(ApiResponse::success(table::update(&state, id, req).await?))
}

/// DELETE /tables/{id} (soft delete)
async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<()>, AppError> {
    table::delete(&state, id).await?;
    Ok(ApiResponse::ok("Table deleted"))
}
