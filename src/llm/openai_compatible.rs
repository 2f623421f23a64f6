// ABOUTME: OpenAI-compatible chat completion provider used for DeepSeek
// ABOUTME: Sends bearer-authenticated chat requests and maps API failures to AppError codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! DeepSeek exposes an `OpenAI`-compatible `/chat/completions` endpoint, so a
//! single implementation covers it and any other compatible service. The base
//! URL and model come from `DEEPSEEK_BASE_URL` and `DEEPSEEK_MODEL`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::constants::llm;
use crate::errors::{AppError, ErrorCode};

/// Connection timeout in seconds
const CONNECT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for an `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL including the version segment, e.g. `https://api.deepseek.com/v1`
    pub base_url: String,
    /// Bearer credential
    pub api_key: Option<String>,
    /// Model used when the request does not set one
    pub default_model: String,
    /// Short provider id used in logs
    pub provider_name: String,
    /// Human-readable name
    pub display_name: String,
    /// Advertised capabilities
    pub capabilities: LlmCapabilities,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// DeepSeek with the default endpoint and `deepseek-chat`
    #[must_use]
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self {
            base_url: llm::DEEPSEEK_DEFAULT_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: llm::DEEPSEEK_DEFAULT_MODEL.to_owned(),
            provider_name: "deepseek".to_owned(),
            display_name: "DeepSeek".to_owned(),
            capabilities: LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
            request_timeout: Duration::from_secs(llm::LLM_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Chat completion client for `OpenAI`-compatible endpoints
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    fn service(&self) -> &str {
        &self.config.display_name
    }

    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            return match status.as_u16() {
                502..=504 => {
                    AppError::external_unavailable(self.service(), "Service is not responding")
                }
                _ => AppError::external_service(
                    self.service(),
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            };
        };

        let detail = error_response.error.message;
        match status.as_u16() {
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{} authentication failed: {detail}", self.service()),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                "LLM rate limit reached. Please wait a moment and try again.",
            ),
            400 | 422 => AppError::external_service(
                self.service(),
                format!("Request rejected: {detail}"),
            ),
            404 => AppError::external_service(
                self.service(),
                format!("Model or endpoint not found: {detail}"),
            ),
            503 => AppError::external_unavailable(self.service(), detail),
            _ => AppError::external_service(
                self.service(),
                format!(
                    "{} - {detail}",
                    error_response.error.error_type.as_deref().unwrap_or("unknown")
                ),
            ),
        }
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.bearer_auth(api_key)
        } else {
            request
        }
    }

    fn send_error(&self, e: &reqwest::Error) -> AppError {
        error!(
            "Failed to send request to {}: {}",
            self.config.provider_name, e
        );
        if e.is_connect() || e.is_timeout() {
            AppError::external_unavailable(
                self.service(),
                format!("Cannot reach {}", self.config.base_url),
            )
        } else {
            AppError::external_service(self.service(), "Failed to send request")
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };
        debug!(
            messages = openai_request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")))
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(self.service(), "Failed to read response")
        })?;

        if !status.is_success() {
            warn!(status = %status, "Chat completion request failed");
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::external_service(self.service(), format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(self.service(), "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model,
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self), fields(provider = %self.config.provider_name))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let response = self
            .add_auth_header(self.client.get(self.api_url("models")))
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let healthy = response.status().is_success();
        if healthy {
            debug!("{} health check passed", self.config.provider_name);
        } else {
            warn!(
                "{} health check failed with status: {}",
                self.config.provider_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}
