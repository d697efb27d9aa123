//! Menu API

use axum::{
    Router,
    extract::State,
    middleware,
    routing::get,
};
use shared::error::{ApiResponse, AppError};
use shared::models::{Menu, MenuCreate, MenuQuery, MenuUpdate};

use crate::auth::require_admin;
use crate::services::menu;
use crate::state::AppState;
use super::extract::{AppJson, AppPath, AppQuery};

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/menus", get(list))
        .route("/menus/{id}", get(get_by_id))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/menus", axum::routing::post(create))
        .route("/menus/{id}", axum::routing::patch(update).delete(delete))
        .layer(middleware::from_fn(require_admin))
}

/// GET /menus?page=&limit=&category=&search=
async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MenuQuery>,
) -> Result<ApiResponse<Vec<Menu>>, AppError> {
    let (menus, meta) = menu::list(&state, query).await?;
    Ok(ApiResponse::paginated(menus, meta))
}

async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<Menu>, AppError> {
    Ok(ApiResponse::success(menu::get(&state, id).await?))
}

async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<MenuCreate>,
) -> Result<ApiResponse<Menu>, AppError> {
    Ok(ApiResponse::created("Menu created", menu::create(&state, req).await?))
}

async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<MenuUpdate>,
) -> Result<ApiResponse<Menu>, AppError> {
    Ok(ApiResponse::success_with_message(
        "Menu updated",
        menu::update(&state, id, req).await?,
    ))
}

async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<()>, AppError> {
    menu::delete(&state, id).await?;
    Ok(ApiResponse::ok("Menu deleted"))
}
