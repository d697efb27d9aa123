//! Fixed-window rate limiting keyed by client IP
//!
//! Process-local and advisory. Buckets are pruned by [`RateLimiter::cleanup`],
//! which `main` runs on an interval.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

const WINDOW_SECS: u64 = 60;
const AUTH_PER_MINUTE: u32 = 5;
const PAYMENT_PER_MINUTE: u32 = 30;
const GENERAL_PER_MINUTE: u32 = 120;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// bucket name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        bucket: &'static str,
        ip: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let bucket_map = map.entry(bucket).or_default();
        let now = Instant::now();

        let entry = bucket_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Remove entries older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for bucket_map in map.values_mut() {
            bucket_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }
        map.retain(|_, bucket_map| !bucket_map.is_empty());
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.inner.lock().await.values().map(HashMap::len).sum()
    }
}

/// X-Forwarded-For first, then the peer address.
fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    state: &AppState,
    bucket: &'static str,
    max_requests: u32,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_ip(&request);
    if !state.rate_limiter.check(bucket, &ip, max_requests, WINDOW_SECS).await {
        tracing::warn!(bucket, ip = %ip, "Rate limit exceeded");
        return AppError::too_many_requests().into_response();
    }
    next.run(request).await
}

/// Login and registration: 5 requests/minute per IP
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    limit(&state, "auth", AUTH_PER_MINUTE, request, next).await
}

/// Payment intent and webhook: 30 requests/minute per IP
pub async fn payment_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    limit(&state, "payment", PAYMENT_PER_MINUTE, request, next).await
}

/// Everything else: 120 requests/minute per IP
pub async fn general_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    limit(&state, "general", GENERAL_PER_MINUTE, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_window_allows_then_blocks() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check("auth", "10.0.0.1", 3, 60).await);
        }
        assert!(!limiter.check("auth", "10.0.0.1", 3, 60).await);
        // other IPs and buckets are independent
        assert!(limiter.check("auth", "10.0.0.2", 3, 60).await);
        assert!(limiter.check("general", "10.0.0.1", 3, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_and_cleanup_prunes() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("auth", "10.0.0.1", 1, 60).await);
        assert!(!limiter.check("auth", "10.0.0.1", 1, 60).await);

        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        assert!(limiter.check("auth", "10.0.0.1", 1, 60).await);

        tokio::time::advance(std::time::Duration::from_secs(301)).await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked().await, 0);
    }

    #[test]
    fn test_extract_ip_prefers_forwarded_for() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&req), "203.0.113.9");

        let req = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(extract_ip(&req), "unknown");
    }
}
