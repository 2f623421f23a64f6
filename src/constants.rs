// ABOUTME: System-wide constants and configuration defaults for the weatherdash server
// ABOUTME: Re-exports the core crate's domain constants alongside server-only values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Server-level constants. Domain constants live in `weatherdash_core::constants`
//! and are re-exported here so callers have a single import path.

pub use weatherdash_core::constants::{backend, cache, llm, polling, weather};

/// Service identifiers used in logs and health responses
pub mod service_names {
    /// Name of the server binary and service
    pub const WEATHERDASH_SERVER: &str = "weatherdash-server";
}

/// Network defaults
pub mod network {
    /// Default HTTP bind address
    pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 3000;
    /// Per-request timeout applied by the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: u64 = 90;
}

/// Environment variable names
pub mod env_vars {
    /// Credential read by the chat handler
    pub const CHAT_API_KEY: &str = "DEEPSEEK_API_KEY";
    /// Credential read by the insights handler (distinct casing)
    pub const INSIGHTS_API_KEY: &str = "Deepseek_API_KEY";
}

/// Client-facing messages returned by the AI handlers
pub mod messages {
    /// Chat request without a message
    pub const MESSAGE_REQUIRED: &str = "Message is required";
    /// Generic chat failure
    pub const CHAT_FAILED: &str = "Failed to process your request. Please try again.";
    /// Chat health message
    pub const CHAT_RUNNING: &str = "AI Chat API is running";
    /// Insights credential missing
    pub const INSIGHTS_KEY_MISSING: &str = "DeepSeek API key not configured";
    /// No weather rows were available
    pub const NO_WEATHER_DATA: &str = "No weather data available";
    /// Insight generation failed
    pub const INSIGHTS_FAILED: &str = "Failed to generate AI insights";
    /// POST insights with a non-array payload
    pub const INVALID_WEATHER_DATA: &str = "Invalid weather data provided";
    /// PUT insights without a city
    pub const CITY_DATA_REQUIRED: &str = "City data is required";
    /// PUT insights produced nothing
    pub const CITY_INSIGHT_FAILED: &str = "Failed to generate city insight";
    /// Generic insight failure detail
    pub const INSIGHTS_FAILED_DETAILS: &str = "The insight provider request failed";
    /// Chat data source label
    pub const CHAT_DATA_SOURCE: &str = "Real-time weather data + AI Analysis";
}
