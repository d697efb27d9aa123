//! Registration, login and profile

use axum::{Extension, Router, extract::State, middleware, routing::{get, post}};
use shared::error::{ApiResponse, AppError};
use shared::models::{Customer, CustomerUpdate, LoginRequest, LoginResponse, RegisterRequest};

use crate::auth::CurrentCustomer;
use crate::auth::rate_limit::auth_rate_limit;
use crate::services::customer;
use crate::state::AppState;
use super::extract::AppJson;

/// Public: `/auth/register`, `/auth/login`
pub fn public_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .layer(middleware::from_fn_with_state(state.clone(), auth_rate_limit))
}

/// Bearer: `/me`
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me).patch(update_me))
}

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<ApiResponse<Customer>, AppError> {
    let customer = customer::register(&state, req).await?;
    Ok(ApiResponse::created("Registered", customer))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    Ok(ApiResponse::success(customer::login(&state, req).await?))
}

async fn me(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
) -> Result<ApiResponse<Customer>, AppError> {
    Ok(ApiResponse::success(customer::me(&state, &who).await?))
}

async fn update_me(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppJson(req): AppJson<CustomerUpdate>,
) -> Result<ApiResponse<Customer>, AppError> {
    Ok(ApiResponse::success_with_message(
        "Profile updated",
        customer::update_me(&state, &who, req).await?,
    ))
}
