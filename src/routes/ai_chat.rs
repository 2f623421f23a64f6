// ABOUTME: AI chat route: answers weather questions from live data with an LLM or fallback text
// ABOUTME: Every failure becomes a generic error reply; details are logged only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `/api/ai-chat`
//!
//! - `POST` with `{ message, conversationHistory? }` returns a reply built from
//!   the current summary batch. The history is accepted but not used.
//! - `GET` is a liveness check for the chat surface.

use super::{json_response, parse_body};
use crate::constants::messages::{CHAT_DATA_SOURCE, CHAT_FAILED, CHAT_RUNNING, MESSAGE_REQUIRED};
use crate::context::ServerContext;
use axum::{
    body::Bytes, extract::State, http::StatusCode, response::Response, routing::get, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Chat request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    conversation_history: Option<Value>,
}

/// Chat routes
pub struct AiChatRoutes;

impl AiChatRoutes {
    /// Create the chat routes
    pub fn routes(context: Arc<ServerContext>) -> Router {
        Router::new()
            .route(
                "/api/ai-chat",
                get(Self::handle_status).post(Self::handle_chat),
            )
            .with_state(context)
    }

    fn bad_request() -> Response {
        json_response(
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "error": MESSAGE_REQUIRED }),
        )
    }

    async fn handle_chat(State(context): State<Arc<ServerContext>>, body: Bytes) -> Response {
        let Some(body) = parse_body::<ChatBody>(&body) else {
            return Self::bad_request();
        };
        let history_turns = body
            .conversation_history
            .as_ref()
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let Some(message) = body.message.filter(|m| !m.trim().is_empty()) else {
            return Self::bad_request();
        };

        match context.chat().respond(&message).await {
            Ok(reply) => {
                info!(
                    cities = reply.cities_included,
                    history_turns, "Chat reply generated"
                );
                json_response(
                    StatusCode::OK,
                    json!({
                        "success": true,
                        "response": reply.response,
                        "dataSource": CHAT_DATA_SOURCE,
                        "citiesIncluded": reply.cities_included,
                        "lastUpdate": reply.last_update.to_rfc3339(),
                    }),
                )
            }
            Err(e) => {
                error!(code = ?e.code, error = %e, "Chat request failed");
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": CHAT_FAILED }),
                )
            }
        }
    }

    async fn handle_status() -> Response {
        json_response(
            StatusCode::OK,
            json!({
                "success": true,
                "message": CHAT_RUNNING,
                "timestamp": Utc::now().to_rfc3339(),
            }),
        )
    }
}
