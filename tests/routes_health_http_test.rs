// ABOUTME: HTTP integration tests for health and readiness routes and the middleware stack
// ABOUTME: Exercises the full router so request ids and CORS headers are applied
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::axum_test::AxumTestRequest;
use helpers::stubs::{queries_over, snapshot, test_config, StubLlm, StubProvider};
use std::sync::Arc;
use weatherdash_server::context::ServerContext;
use weatherdash_server::routes::HealthRoutes;
use weatherdash_server::server::build_router;
use weatherdash_server::weather::WeatherQueryApi;

fn context() -> ServerContext {
    let provider = Arc::new(StubProvider::new([snapshot("Paris, FR", 18.0, "Clear")]));
    let queries: Arc<dyn WeatherQueryApi> = Arc::new(queries_over(provider, &["Paris, FR"]));
    ServerContext::new(test_config(), queries)
}

// ============================================================================
// GET /health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_success() {
    let routes = HealthRoutes::routes(Arc::new(context()));

    let response = AxumTestRequest::get("/health").send(routes).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "weatherdash-server");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

// ============================================================================
// GET /ready
// ============================================================================

#[tokio::test]
async fn test_ready_reports_bare_components() {
    let routes = HealthRoutes::routes(Arc::new(context()));

    let body: serde_json::Value = AxumTestRequest::get("/ready").send(routes).await.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["components"]["weatherSource"], "open-meteo");
    assert_eq!(body["components"]["hostedBackend"], false);
    assert_eq!(body["components"]["chatLlm"], false);
    assert_eq!(body["components"]["insightsLlm"], false);
    assert_eq!(body["components"]["dashboard"], false);
}

#[tokio::test]
async fn test_ready_reports_configured_llms() {
    let context = context()
        .with_chat_llm(StubLlm::replying("hi"))
        .with_insights_llm(StubLlm::replying("{}"));
    let routes = HealthRoutes::routes(Arc::new(context));

    let body: serde_json::Value = AxumTestRequest::get("/ready").send(routes).await.json();
    assert_eq!(body["components"]["chatLlm"], true);
    assert_eq!(body["components"]["insightsLlm"], true);
}

#[tokio::test]
async fn test_ready_checks_llm_endpoints_on_request() {
    let context = context().with_chat_llm(StubLlm::replying("hi"));
    let routes = HealthRoutes::routes(Arc::new(context));

    let body: serde_json::Value = AxumTestRequest::get("/ready?checkLlm=true")
        .send(routes.clone())
        .await
        .json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["llmReachable"]["chat"], true);
    assert!(body["llmReachable"]["insights"].is_null());

    let body: serde_json::Value = AxumTestRequest::get("/ready").send(routes).await.json();
    assert!(body.get("llmReachable").is_none());
}

#[tokio::test]
async fn test_ready_is_degraded_when_llm_is_down() {
    let context = context().with_insights_llm(StubLlm::failing());
    let routes = HealthRoutes::routes(Arc::new(context));

    let body: serde_json::Value = AxumTestRequest::get("/ready?checkLlm=true")
        .send(routes)
        .await
        .json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["llmReachable"]["insights"], false);
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_router_assigns_request_id() {
    let router = build_router(&Arc::new(context()));

    let response = AxumTestRequest::get("/health").send(router).await;
    assert_eq!(response.status(), 200);
    let request_id = response.header("x-request-id").unwrap();
    assert!(request_id.starts_with("req_"));
    assert_eq!(request_id.len(), "req_".len() + 32);
}

#[tokio::test]
async fn test_error_body_matches_assigned_request_id() {
    let router = build_router(&Arc::new(context()));

    let response = AxumTestRequest::get("/api/weather?type=city&city=Atlantis")
        .send(router)
        .await;
    assert_eq!(response.status(), 404);
    let header = response.header("x-request-id").unwrap().to_owned();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["request_id"], header.as_str());
}

#[tokio::test]
async fn test_router_propagates_client_request_id() {
    let router = build_router(&Arc::new(context()));

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "client-supplied")
        .send(router)
        .await;
    assert_eq!(response.header("x-request-id"), Some("client-supplied"));
}

#[tokio::test]
async fn test_router_allows_any_origin_by_default() {
    let router = build_router(&Arc::new(context()));

    let response = AxumTestRequest::get("/health")
        .header("origin", "http://localhost:5173")
        .send(router)
        .await;
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let router = build_router(&Arc::new(context()));

    let response = AxumTestRequest::get("/api/nope").send(router).await;
    assert_eq!(response.status(), 404);
}
