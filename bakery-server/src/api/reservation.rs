//! Reservation API

use axum::{
    Extension, Router,
    extract::State,
    routing::get,
};
use shared::error::{ApiResponse, AppError};
use shared::models::{Reservation, ReservationCreate, ReservationUpdate};
use shared::response::PageParams;

use crate::auth::CurrentCustomer;
use crate::services::reservation;
use crate::state::AppState;
use super::extract::{AppJson, AppPath, AppQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(list).post(create))
        .route("/reservations/{id}", get(get_by_id).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppJson(req): AppJson<ReservationCreate>,
) -> Result<ApiResponse<Reservation>, AppError> {
    Ok(ApiResponse::created(
        "Reservation created",
        reservation::create(&state, &who, req).await?,
    ))
}

async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<ApiResponse<Vec<Reservation>>, AppError> {
    let (rows, meta) = reservation::list(&state, &who, params).await?;
    Ok(ApiResponse::paginated(rows, meta))
}

async fn get_by_id(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<Reservation>, AppError> {
    Ok(ApiResponse::success(reservation::get(&state, &who, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<ReservationUpdate>,
) -> Result<ApiResponse<Reservation>, AppError> {
    Ok(ApiResponse::success_with_message(
        "Reservation updated",
        reservation::update(&state, &who, id, req).await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<()>, AppError> {
    reservation::delete(&state, &who, id).await?;
    Ok(ApiResponse::ok("Reservation deleted"))
}
