// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness reports the service identity; readiness reports which collaborators are wired
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! `GET /ready?checkLlm=true` also asks each configured model endpoint
//! whether it answers; the plain form never leaves the process.

use crate::constants::service_names::WEATHERDASH_SERVER;
use crate::ai::InsightsService;
use crate::context::ServerContext;
use crate::llm::LlmProvider;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Readiness query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadyParams {
    #[serde(default)]
    check_llm: bool,
}

/// `null` when not configured, else whether the endpoint answered
async fn llm_reachable(llm: Option<&Arc<dyn LlmProvider>>) -> Value {
    let Some(llm) = llm else {
        return Value::Null;
    };
    let up = llm.health_check().await.unwrap_or_else(|e| {
        warn!(provider = llm.name(), error = %e, "LLM health check failed");
        false
    });
    Value::Bool(up)
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(context: Arc<ServerContext>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(context)
    }

    async fn handle_health() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "service": WEATHERDASH_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(
        State(context): State<Arc<ServerContext>>,
        Query(params): Query<ReadyParams>,
    ) -> Json<Value> {
        let mut body = serde_json::json!({
            "status": "ready",
            "components": {
                "weatherSource": context.config().weather.source,
                "hostedBackend": context.backend().is_some(),
                "chatLlm": context.chat().has_llm(),
                "insightsLlm": context.insights().is_some(),
                "dashboard": context.dashboard().is_some(),
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if params.check_llm {
            let (chat, insights) = tokio::join!(
                llm_reachable(context.chat().llm()),
                llm_reachable(context.insights().map(InsightsService::llm)),
            );
            if chat == Value::Bool(false) || insights == Value::Bool(false) {
                body["status"] = Value::from("degraded");
            }
            body["llmReachable"] = serde_json::json!({ "chat": chat, "insights": insights });
        }
        Json(body)
    }
}
