// ABOUTME: Route module organization for the weatherdash HTTP endpoints
// ABOUTME: Each domain module holds route definitions and thin handlers over the server context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route modules
//!
//! Handlers stay thin: they validate input, call the query layer or an AI
//! service from the [`crate::context::ServerContext`], and shape the JSON reply.

/// Chat endpoint
pub mod ai_chat;
/// Insight report endpoints
pub mod ai_insights;
/// Dashboard view endpoints
pub mod dashboard;
/// Health and readiness
pub mod health;
/// Weather query endpoint
pub mod weather;

pub use ai_chat::AiChatRoutes;
pub use ai_insights::AiInsightsRoutes;
pub use dashboard::DashboardRoutes;
pub use health::HealthRoutes;
pub use weather::WeatherRoutes;

use crate::errors::AppError;
use crate::middleware::REQUEST_ID_HEADER;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

/// JSON reply with an explicit status
pub(crate) fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

/// Parse a request body, `None` when it is not valid JSON for `T`
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected malformed request body");
            None
        }
    }
}

/// Tag an error reply with the id the request-id layer assigned
pub(crate) fn tag_request_id(error: AppError, headers: &HeaderMap) -> AppError {
    let Some(id) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) else {
        return error;
    };
    error.with_request_id(id)
}
