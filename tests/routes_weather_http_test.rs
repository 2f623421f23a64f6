// ABOUTME: HTTP integration tests for the weather query route
// ABOUTME: Covers every query type, parameter validation, and the legacy response shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::axum_test::AxumTestRequest;
use helpers::stubs::{queries_over, snapshot, test_config, StubProvider};
use serde_json::Value;
use std::sync::Arc;
use weatherdash_server::context::ServerContext;
use weatherdash_server::routes::WeatherRoutes;
use weatherdash_server::weather::WeatherQueryApi;

fn weather_routes() -> axum::Router {
    let provider = Arc::new(StubProvider::new([
        snapshot("Paris, FR", 18.0, "Clear"),
        snapshot("Dubai, AE", 41.0, "Clear"),
        snapshot("Reykjavik, IS", 2.0, "Snow"),
    ]));
    let queries: Arc<dyn WeatherQueryApi> = Arc::new(queries_over(
        provider,
        &["Paris, FR", "Dubai, AE", "Reykjavik, IS"],
    ));
    WeatherRoutes::routes(Arc::new(ServerContext::new(test_config(), queries)))
}

async fn get(uri: &str) -> (u16, Value) {
    let response = AxumTestRequest::get(uri).send(weather_routes()).await;
    (response.status(), response.json())
}

#[tokio::test]
async fn test_city_query() {
    let (status, body) = get("/api/weather?type=city&city=Paris").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["location"], "Paris, FR");
    assert_eq!(body["data"]["weatherCondition"], "Clear");
    assert!(body["data"]["windSpeed"].is_number());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_cities_query_honors_limit() {
    let (status, body) = get("/api/weather?type=cities&limit=2").await;
    assert_eq!(status, 200);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[1]["location"], "Dubai, AE");

    let (_, body) = get("/api/weather?type=cities").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_global_insights_query() {
    let (status, body) = get("/api/weather?type=global-insights").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["totalCitiesMonitored"], 3);
    assert_eq!(body["data"]["citiesWithAlerts"], 1);
    assert_eq!(body["data"]["warmestCity"]["name"], "Dubai, AE");
    assert_eq!(body["data"]["coolestCity"]["name"], "Reykjavik, IS");
}

#[tokio::test]
async fn test_alert_query() {
    let (status, body) = get("/api/weather?type=alert&city=Dubai").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["severity"], "severe");
    assert_eq!(body["data"]["city"], "Dubai, AE");
}

#[tokio::test]
async fn test_stats_query() {
    let (status, body) = get("/api/weather?type=stats").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["apiSource"], "stub");
    assert_eq!(body["data"]["totalRequests"], 1);
}

#[tokio::test]
async fn test_missing_type_is_rejected() {
    let (status, body) = get("/api/weather").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_errors_carry_request_id() {
    let response = AxumTestRequest::get("/api/weather?type=city&city=Atlantis")
        .header("x-request-id", "req_weather_1")
        .send(weather_routes())
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"]["request_id"], "req_weather_1");

    let (_, body) = get("/api/weather").await;
    assert!(body["error"].get("request_id").is_none());
}

#[tokio::test]
async fn test_missing_city_is_rejected() {
    let (status, _) = get("/api/weather?type=city").await;
    assert_eq!(status, 400);
    let (status, _) = get("/api/weather?type=alert&city=%20").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_unknown_type_is_rejected() {
    let (status, body) = get("/api/weather?type=forecast").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(body["error"]["message"].as_str().unwrap().contains("forecast"));
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let (status, body) = get("/api/weather?type=city&city=Atlantis").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_legacy_city_view() {
    let (status, body) = get("/api/weather?type=city&city=Paris&legacy=true").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["location"], "Paris, FR");
    assert_eq!(body["data"]["aqi"], 18.0);
    assert_eq!(body["data"]["dominantPollutant"], "Unknown");
    assert_eq!(body["data"]["dominentPollutant"], "Unknown");
}

#[tokio::test]
async fn test_legacy_insights_view() {
    let (status, body) = get("/api/weather?type=global-insights&legacy=true").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["totalCitiesMonitored"], 3);
    assert_eq!(body["data"]["worstCity"]["name"], "Dubai, AE");
    assert_eq!(body["data"]["bestCity"]["name"], "Reykjavik, IS");
}
