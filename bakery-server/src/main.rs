//! bakery-server entry point

use std::net::SocketAddr;

use bakery_server::{AppState, Config, build_app};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bakery_server=info,tower_http=info".into());
    let production = std::env::var("SERVER_ENV").is_ok_and(|v| v == "production");

    if production {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;
    tracing::info!("Starting bakery-server (env: {})", config.environment);

    let http_port = config.http_port;
    let state = AppState::new(config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Startup failed");
    })?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = build_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("bakery-server HTTP listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
