// ABOUTME: AI summarization over weather data: chat replies and insight reports
// ABOUTME: Both run on the LlmProvider trait and the weather query layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Chat replies with a templated fallback
pub mod chat;
/// Insight reports
pub mod insights;
/// Compile-time system prompts
pub mod prompts;

pub use chat::{
    build_context_prompt, fallback_response, is_weather_detail_request, ChatReply, ChatSummarizer,
};
pub use insights::{CityInsight, CityWeatherRecord, InsightsService, WeatherInsights};
