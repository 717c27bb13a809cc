mod config;
mod errors;
mod gaps;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;
mod upload;

use anyhow::{Context, Result};
use axum::http::{HeaderName, HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DeploymentMode};
use crate::routes::build_router;
use crate::state::{AppState, API_KEY_HEADER};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartCV API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Mode: {} | model call tracing: {} | max corrections: {}",
        config.mode.as_str(),
        config.trace_model_calls,
        config.max_corrections
    );
    info!("Local model server: {}", config.local_llm_url);
    if config.mode == DeploymentMode::Production {
        info!("Hosted provider: {} (caller key required)", config.hosted_llm_url);
    }

    let cors = build_cors(&config.cors_origins)?;
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    // Build app state
    let state = AppState::new(config);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS restricted to the configured front-end origins.
fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        warn!("CORS_ALLOWED_ORIGINS is empty; browser clients will be rejected");
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
        ]))
}
