//! Order API

use axum::{
    Extension, Router,
    extract::State,
    middleware,
    routing::{delete, get, patch, post},
};
use shared::error::{ApiResponse, AppError};
use shared::models::{
    Order, OrderCreate, OrderDetail, OrderStatusUpdate, OrderTransition, PaymentIntent,
};
use shared::response::PageParams;

use crate::auth::rate_limit::payment_rate_limit;
use crate::auth::{CurrentCustomer, require_admin};
use crate::services::{order, payment};
use crate::state::AppState;
use super::extract::{AppJson, AppPath, AppQuery};

pub fn router(state: &AppState) -> Router<AppState> {
    let intent = Router::new()
        .route("/orders/{id}/payment", post(create_payment))
        .layer(middleware::from_fn_with_state(state.clone(), payment_rate_limit));

    Router::new()
        .route("/orders", get(list).post(create))
        .route("/orders/{id}", get(get_by_id))
        .route("/orders/{id}/transitions", get(transitions))
        .merge(intent)
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}/status", patch(update_status))
        .route("/orders/{id}", delete(remove))
        .layer(middleware::from_fn(require_admin))
}

/// POST /orders
async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppJson(req): AppJson<OrderCreate>,
) -> Result<ApiResponse<Order>, AppError> {
    Ok(ApiResponse::created("Order created", order::create(&state, &who, req).await?))
}

/// GET /orders: own orders, or every order for admins
async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<ApiResponse<Vec<Order>>, AppError> {
    let (orders, meta) = order::list(&state, &who, params).await?;
    Ok(ApiResponse::paginated(orders, meta))
}

async fn get_by_id(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<OrderDetail>, AppError> {
    Ok(ApiResponse::success(order::get(&state, &who, id).await?))
}

async fn transitions(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<Vec<OrderTransition>>, AppError> {
    Ok(ApiResponse::success(order::transitions(&state, &who, id).await?))
}

/// POST /orders/{id}/payment: hosted checkout redirect
async fn create_payment(
    State(state): State<AppState>,
    Extension(who): Extension<CurrentCustomer>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<PaymentIntent>, AppError> {
    Ok(ApiResponse::success(payment::create_intent(&state, &who, id).await?))
}

/// PATCH /orders/{id}/status (admin)
async fn update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<OrderStatusUpdate>,
) -> Result<ApiResponse<Order>, AppError> {
    Ok(ApiResponse::success_with_message(
        "Order status updated",
        order::update_status(&state, id, req.status).await?,
    ))
}

/// DELETE /orders/{id} (admin)
async fn remove(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<ApiResponse<()>, AppError> {
    order::delete(&state, id).await?;
    Ok(ApiResponse::ok("Order deleted"))
}
