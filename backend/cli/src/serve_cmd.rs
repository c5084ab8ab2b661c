//! `forestclaim serve`: run the HTTP gateway until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use forestclaim_config::ForestClaimConfig;
use forestclaim_gateway::{build_router, GatewayState};
use forestclaim_understanding::RecognitionAdapter;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{recognition_settings, server_addr};

pub async fn run(config: &ForestClaimConfig, port: Option<u16>, bind: Option<&str>) -> Result<()> {
    let adapter = RecognitionAdapter::from_settings(&recognition_settings(config))?;
    info!(
        engine = adapter.engine(),
        lang = adapter.default_language(),
        "Starting ForestClaim gateway"
    );

    let state = Arc::new(GatewayState::new(adapter));
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = server_addr(config, port, bind);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
