//! HTTP routes
//!
//! Public routes (health, catalogue, auth, webhook) sit beside bearer
//! routes wrapped in [`require_auth`]. Admin routers add
//! [`require_admin`](crate::auth::require_admin) inside that layer.

pub mod auth;
pub mod cart;
mod extract;
pub mod health;
pub mod inventory;
pub mod menu;
pub mod order;
pub mod payment;
pub mod reservation;
pub mod table;
pub mod wishlist;

use axum::{Router, middleware, routing::get};
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::rate_limit::general_rate_limit;
use crate::auth::require_auth;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no tower layers
pub fn build_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::public_router(state))
        .merge(menu::public_router())
        .merge(table::public_router())
        .merge(payment::public_router(state));

    let protected = Router::new()
        .merge(auth::router())
        .merge(cart::router())
        .merge(wishlist::router())
        .merge(order::router(state))
        .merge(reservation::router())
        .merge(menu::admin_router())
        .merge(order::admin_router())
        .merge(table::admin_router())
        .merge(inventory::admin_router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}

/// Fully layered application, used by `main` and the HTTP tests
pub fn build_app(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout;
    build_router(&state)
        .layer(middleware::from_fn_with_state(state.clone(), general_rate_limit))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
