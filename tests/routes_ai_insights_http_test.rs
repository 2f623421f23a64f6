// ABOUTME: HTTP integration tests for the AI insight routes
// ABOUTME: Covers live and posted batch reports, single-city briefings, and error replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::axum_test::{AxumTestRequest, AxumTestResponse};
use helpers::stubs::{queries_over, snapshot, test_config, StubLlm, StubProvider};
use serde_json::{json, Value};
use std::sync::Arc;
use weatherdash_server::context::ServerContext;
use weatherdash_server::llm::{LlmProvider, MessageRole};
use weatherdash_server::routes::AiInsightsRoutes;
use weatherdash_server::weather::WeatherQueryApi;

const REPORT: &str = r#"Here you go:
{"summary":"Heat dominates the Gulf","keyFindings":["Dubai above 40°C"],"recommendations":["Stay hydrated"],"riskCities":["Dubai, AE"]}"#;

fn context_with(cities: &[&str]) -> ServerContext {
    let provider = Arc::new(StubProvider::new([
        snapshot("Paris, FR", 18.0, "Clear"),
        snapshot("Dubai, AE", 41.0, "Clear"),
        snapshot("Reykjavik, IS", 2.0, "Snow"),
    ]));
    let queries: Arc<dyn WeatherQueryApi> = Arc::new(queries_over(provider, cities));
    ServerContext::new(test_config(), queries)
}

fn routes(llm: Option<Arc<StubLlm>>) -> axum::Router {
    let mut context = context_with(&["Paris, FR", "Dubai, AE", "Reykjavik, IS"]);
    if let Some(llm) = llm {
        context = context.with_insights_llm(llm as Arc<dyn LlmProvider>);
    }
    AiInsightsRoutes::routes(Arc::new(context))
}

async fn body_of(response: AxumTestResponse) -> (u16, Value) {
    (response.status(), response.json())
}

// ============================================================================
// Credential check
// ============================================================================

#[tokio::test]
async fn test_every_method_requires_the_credential() {
    let requests = [
        AxumTestRequest::get("/api/ai-insights"),
        AxumTestRequest::post("/api/ai-insights").json(&json!({ "weatherData": [] })),
        AxumTestRequest::put("/api/ai-insights").json(&json!({ "cityData": { "city": "Paris" } })),
    ];

    for request in requests {
        let (status, body) = body_of(request.send(routes(None)).await).await;
        assert_eq!(status, 500);
        assert_eq!(body["error"], "DeepSeek API key not configured");
    }
}

// ============================================================================
// GET: live batch
// ============================================================================

#[tokio::test]
async fn test_live_report() {
    let llm = StubLlm::replying(REPORT);
    let (status, body) = body_of(
        AxumTestRequest::get("/api/ai-insights")
            .send(routes(Some(llm.clone())))
            .await,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["insights"]["summary"], "Heat dominates the Gulf");
    assert_eq!(body["insights"]["riskCities"][0], "Dubai, AE");
    assert_eq!(body["metadata"]["source"], "DEEPSEEK_AI_ANALYSIS");
    assert_eq!(body["metadata"]["model"], "deepseek-chat");
    assert_eq!(body["metadata"]["citiesAnalyzed"], 3);
    assert!(body["metadata"]["generatedAt"].is_string());

    let request = &llm.requests()[0];
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert!(request.messages[1]
        .content
        .starts_with("Current readings for 3 cities"));
    assert_eq!(request.max_tokens, Some(1_500));
}

#[tokio::test]
async fn test_live_report_with_empty_catalog() {
    let context = context_with(&[]).with_insights_llm(StubLlm::replying(REPORT));
    let (status, body) = body_of(
        AxumTestRequest::get("/api/ai-insights")
            .send(AiInsightsRoutes::routes(Arc::new(context)))
            .await,
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "No weather data available");
}

#[tokio::test]
async fn test_prose_reply_becomes_summary() {
    let llm = StubLlm::replying("  Mild everywhere.  ");
    let (status, body) = body_of(
        AxumTestRequest::get("/api/ai-insights")
            .send(routes(Some(llm)))
            .await,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["insights"]["summary"], "Mild everywhere.");
    assert_eq!(body["insights"]["keyFindings"], json!([]));
}

#[tokio::test]
async fn test_llm_failure_returns_generic_details() {
    let (status, body) = body_of(
        AxumTestRequest::get("/api/ai-insights")
            .send(routes(Some(StubLlm::failing())))
            .await,
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to generate AI insights");
    assert_eq!(body["details"], "The insight provider request failed");
}

// ============================================================================
// POST: caller-supplied batch
// ============================================================================

#[tokio::test]
async fn test_posted_weather_data() {
    let llm = StubLlm::replying(REPORT);
    let payload = json!({
        "weatherData": [
            { "city": "Lima", "temperature": 19, "humidity": 70, "weatherCondition": "Clouds" },
            { "location": "Oslo, NO", "temperature": -3 }
        ]
    });

    let (status, body) = body_of(
        AxumTestRequest::post("/api/ai-insights")
            .json(&payload)
            .send(routes(Some(llm.clone())))
            .await,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["metadata"]["citiesAnalyzed"], 2);
    let prompt = &llm.requests()[0].messages[1].content;
    assert!(prompt.contains("- Lima: 19°C, 70% humidity"));
    assert!(prompt.contains("- Oslo, NO: -3°C"));
}

#[tokio::test]
async fn test_posted_legacy_air_quality_data() {
    let payload = json!({
        "airQualityData": [{ "city": "Delhi", "aqi": 41, "dominentPollutant": "pm25" }]
    });

    let (status, body) = body_of(
        AxumTestRequest::post("/api/ai-insights")
            .json(&payload)
            .send(routes(Some(StubLlm::replying(REPORT))))
            .await,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["metadata"]["citiesAnalyzed"], 1);
}

#[tokio::test]
async fn test_posted_payload_must_be_an_array() {
    for payload in [
        json!({ "weatherData": { "city": "Lima" } }),
        json!({ "somethingElse": [] }),
        json!({ "weatherData": [42] }),
    ] {
        let (status, body) = body_of(
            AxumTestRequest::post("/api/ai-insights")
                .json(&payload)
                .send(routes(Some(StubLlm::replying(REPORT))))
                .await,
        )
        .await;
        assert_eq!(status, 400, "payload {payload}");
        assert_eq!(body["error"], "Invalid weather data provided");
    }
}

// ============================================================================
// PUT: single city
// ============================================================================

#[tokio::test]
async fn test_city_briefing() {
    let llm = StubLlm::replying(r#"{"summary":"Dangerous heat","recommendations":["Stay inside"]}"#);
    let (status, body) = body_of(
        AxumTestRequest::put("/api/ai-insights")
            .json(&json!({ "cityData": { "city": "Dubai", "temperature": 41 } }))
            .send(routes(Some(llm.clone())))
            .await,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["insight"]["city"], "Dubai");
    assert_eq!(body["insight"]["summary"], "Dangerous heat");
    assert_eq!(body["insight"]["riskLevel"], "severe");
    assert_eq!(body["metadata"]["city"], "Dubai");
    assert_eq!(llm.requests()[0].max_tokens, Some(500));
}

#[tokio::test]
async fn test_city_data_is_required() {
    for request in [
        AxumTestRequest::put("/api/ai-insights").json(&json!({})),
        AxumTestRequest::put("/api/ai-insights").json(&json!({ "cityData": null })),
        AxumTestRequest::put("/api/ai-insights").raw("not json"),
    ] {
        let (status, body) = body_of(request.send(routes(Some(StubLlm::replying("x")))).await).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "City data is required");
    }
}

#[tokio::test]
async fn test_empty_city_reply_is_not_found() {
    let (status, body) = body_of(
        AxumTestRequest::put("/api/ai-insights")
            .json(&json!({ "cityData": { "city": "Paris" } }))
            .send(routes(Some(StubLlm::replying("   "))))
            .await,
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Failed to generate city insight");
}

#[tokio::test]
async fn test_city_briefing_failure() {
    let (status, body) = body_of(
        AxumTestRequest::put("/api/ai-insights")
            .json(&json!({ "cityData": { "city": "Paris" } }))
            .send(routes(Some(StubLlm::failing())))
            .await,
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to generate city insight");
    assert_eq!(body["details"], "The insight provider request failed");
}
