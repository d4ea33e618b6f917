mod config;
mod errors;
mod proxy;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::proxy::gateway::Gateway;
use crate::proxy::upstream::ReqwestUpstream;
use crate::routes::build_router;
use crate::state::AppState;

const UPSTREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume gateway v{}", env!("CARGO_PKG_VERSION"));

    // One client for the whole process; its connection pool is shared by every request
    let upstream = Arc::new(ReqwestUpstream::new(
        UPSTREAM_CONNECT_TIMEOUT,
        config.max_response_bytes,
    )?);
    let gateway = Gateway::new(upstream, config.backend_url.clone());
    info!("Forwarding analyzer calls to {}", gateway.base_url());

    let state = AppState {
        gateway: Arc::new(gateway),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the frontend host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
