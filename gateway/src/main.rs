mod config;
mod routes;
mod verify;

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::config::GatewayConfig;
use crate::verify::VerifyConfig;

/// Shared application state passed to all route handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub secret: String,
    pub verify: VerifyConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignored in production where env vars are set externally)
    let _ = dotenvy::dotenv();

    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    info!(
        "Configuration loaded (port={}, algorithm={}, header={})",
        config.port, config.verify.algorithm, config.verify.hmac_header
    );

    let state = AppState {
        secret: config.secret.clone(),
        verify: config.verify.clone(),
    };

    // Build router; the body limit guards the raw-byte capture on the
    // webhook endpoint
    let app = Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/webhook", post(routes::webhook::receive))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Webhook gateway v1.0.0 listening on {}", addr);
    info!("Routes:");
    info!("  GET  /api/health");
    info!("  POST /api/webhook");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
