//! Payment notification webhook and checkout config
//!
//! POST /payment/notification receives the raw body; the signature is
//! checked before anything is written.

use axum::{Router, body::Bytes, extract::State, middleware, routing::{get, post}};
use shared::error::{ApiResponse, AppError};
use shared::models::PaymentConfig;

use crate::auth::rate_limit::payment_rate_limit;
use crate::services::payment::{self, WebhookOutcome};
use crate::state::AppState;

pub fn public_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/payment/notification", post(notification))
        .layer(middleware::from_fn_with_state(state.clone(), payment_rate_limit))
        .route("/payment/config", get(config))
}

async fn notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<WebhookOutcome>, AppError> {
    let outcome = payment::handle_notification(&state, &body).await?;
    Ok(ApiResponse::success_with_message("Notification processed", outcome))
}

async fn config(State(state): State<AppState>) -> ApiResponse<PaymentConfig> {
    ApiResponse::success(payment::client_config(&state))
}
