// ABOUTME: HTTP server assembly: merges domain routers and applies the middleware stack
// ABOUTME: Serves until Ctrl-C or SIGTERM, then drains in-flight requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::network::REQUEST_TIMEOUT_SECS;
use crate::context::ServerContext;
use crate::middleware::{make_request_span, setup_cors, MakeRequestUuid, REQUEST_ID_HEADER};
use crate::routes::{AiChatRoutes, AiInsightsRoutes, DashboardRoutes, HealthRoutes, WeatherRoutes};
use anyhow::{Context as _, Result};
use axum::Router;
use http::{HeaderName, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router with every route and middleware layer
pub fn build_router(context: &Arc<ServerContext>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(context)))
        .merge(WeatherRoutes::routes(Arc::clone(context)))
        .merge(AiChatRoutes::routes(Arc::clone(context)))
        .merge(AiInsightsRoutes::routes(Arc::clone(context)))
        .merge(DashboardRoutes::routes(Arc::clone(context)))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(REQUEST_TIMEOUT_SECS),
                ))
                .layer(setup_cors(&context.config().http)),
        )
}

/// Bind and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn run(context: Arc<ServerContext>) -> Result<()> {
    let address = context.config().bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "HTTP server listening");

    axum::serve(listener, build_router(&context))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown signal received");
}
