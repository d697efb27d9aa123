//! Application state

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::auth::{JwtService, RateLimiter};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::{PgStore, Store};
use crate::gateway::{MidtransGateway, PaymentGateway};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistence port
    pub store: Arc<dyn Store>,
    /// Hosted-checkout provider
    pub gateway: Arc<dyn PaymentGateway>,
    pub clock: Arc<dyn Clock>,
    pub jwt: JwtService,
    /// Per-IP request buckets
    pub rate_limiter: RateLimiter,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Postgres, apply migrations and wire the Midtrans client
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect_with(config.database.connect_options()?)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let gateway = MidtransGateway::new(&config.midtrans);
        Ok(Self::from_parts(
            config,
            Arc::new(PgStore::new(pool)),
            Arc::new(gateway),
            Arc::new(SystemClock),
        ))
    }

    /// Assemble state from already-built collaborators
    pub fn from_parts(
        config: Config,
        store: Arc<dyn Store>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            jwt: JwtService::new(&config.jwt_secret, config.jwt_expiry_hours),
            rate_limiter: RateLimiter::new(),
            config: Arc::new(config),
        }
    }
}
