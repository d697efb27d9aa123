//! Inventory API (admin)

use axum::{
    Router,
    extract::State,
    middleware,
    routing::get,
};
use shared::error::{ApiResponse, AppError};
use shared::models::{Ingredient, IngredientCreate, IngredientUpdate};

use crate::auth::require_admin;
use crate::services::inventory;
use crate::state::AppState;
use super::extract::{AppJson, AppPath};

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list).post(create))
        .route("/inventory/{id}", get(get_by_id).patch(update).delete(delete))
        .layer(middleware::from_fn(require_admin))
}

async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Ingredient>>, AppError> {
    Ok(ApiResponse::success(inventory::list(&state).await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<Ingredient>, AppError> {
    Ok(ApiResponse::success(inventory::get(&state, id).await?))
}

async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<IngredientCreate>,
) -> Result<ApiResponse<Ingredient>, AppError> {
    Ok(ApiResponse::created(
        "Ingredient created",
        inventory::create(&state, req).await?,
    ))
}

async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<IngredientUpdate>,
) -> Result<ApiResponse<Ingredient>, AppError> {
    Ok(ApiResponse::success(inventory::update(&state, id, req).await?))
}

async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<()>, AppError> {
    inventory::delete(&state, id).await?;
    Ok(ApiResponse::ok("Ingredient deleted"))
}
