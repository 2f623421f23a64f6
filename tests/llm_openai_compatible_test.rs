// ABOUTME: Integration tests for the OpenAI-compatible LLM provider against a mock server
// ABOUTME: Verifies request shape, bearer auth, response parsing, and error code mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::json;
use weatherdash_server::errors::ErrorCode;
use weatherdash_server::llm::{
    ChatMessage, ChatRequest, LlmCapabilities, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new(
        OpenAiCompatibleConfig::deepseek("sk-test").with_base_url(format!("{}/v1", server.uri())),
    )
    .unwrap()
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("You are terse."),
        ChatMessage::user("Is it raining in Paris?"),
    ])
    .with_temperature(0.25)
    .with_max_tokens(64)
}

#[test]
fn test_deepseek_defaults() {
    let config = OpenAiCompatibleConfig::deepseek("sk-test");
    assert_eq!(config.base_url, "https://api.deepseek.com/v1");
    assert_eq!(config.default_model, "deepseek-chat");
    assert_eq!(config.provider_name, "deepseek");
    assert!(config.capabilities.contains(LlmCapabilities::SYSTEM_MESSAGES));

    let provider = OpenAiCompatibleProvider::new(config.with_model("deepseek-reasoner")).unwrap();
    assert_eq!(provider.default_model(), "deepseek-reasoner");
    assert_eq!(provider.display_name(), "DeepSeek");
}

#[tokio::test]
async fn test_complete_sends_openai_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "deepseek-chat",
            "temperature": 0.25,
            "max_tokens": 64,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "deepseek-chat",
            "choices": [{
                "message": { "role": "assistant", "content": "Light rain right now." },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server).complete(&request()).await.unwrap();

    assert_eq!(response.content, "Light rain right now.");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 25);

    let received = &server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&received.body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "Is it raining in Paris?");
}

#[tokio::test]
async fn test_request_model_overrides_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "model": "deepseek-reasoner" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "deepseek-reasoner",
            "choices": [{ "message": { "content": null }, "finish_reason": "length" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .complete(&request().with_model("deepseek-reasoner"))
        .await
        .unwrap();
    assert!(response.content.is_empty());
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_error_statuses_map_to_codes() {
    let cases = [
        (401, ErrorCode::ExternalAuthFailed),
        (429, ErrorCode::ExternalRateLimited),
        (400, ErrorCode::ExternalServiceError),
        (503, ErrorCode::ExternalServiceUnavailable),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "message": "nope", "type": "invalid_request_error" }
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).complete(&request()).await.unwrap_err();
        assert_eq!(err.code, expected, "status {status}");
    }
}

#[tokio::test]
async fn test_unstructured_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = provider_for(&server).complete(&request()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "model": "deepseek-chat", "choices": [] })),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server).complete(&request()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_health_check_uses_models_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    assert!(provider_for(&server).health_check().await.unwrap());
}
