// ABOUTME: LLM provider constants for the DeepSeek OpenAI-compatible endpoint
// ABOUTME: Default model, base URL, temperatures, and token limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// DeepSeek OpenAI-compatible API base URL
pub const DEEPSEEK_DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Default DeepSeek chat model
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

/// Chat summarization temperature
pub const CHAT_TEMPERATURE: f32 = 0.4;

/// Insight generation temperature
pub const INSIGHTS_TEMPERATURE: f32 = 0.3;

/// Token ceiling for chat answers
pub const CHAT_MAX_TOKENS: u32 = 1_000;

/// Token ceiling for multi-city insights
pub const INSIGHTS_MAX_TOKENS: u32 = 1_500;

/// Token ceiling for a single-city insight
pub const CITY_INSIGHT_MAX_TOKENS: u32 = 500;

/// LLM request timeout in seconds
pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Label reported as the insights source
pub const INSIGHTS_SOURCE: &str = "DEEPSEEK_AI_ANALYSIS";
