// ABOUTME: AI insight routes for batch reports over live or posted data and single-city briefings
// ABOUTME: Every method checks the insights credential first; failures return generic details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `/api/ai-insights`
//!
//! | method | input | success |
//! |---|---|---|
//! | `GET` | live summary batch | `{ success, insights, metadata }` |
//! | `POST` | `{ weatherData \| airQualityData: [...] }` | `{ success, insights, metadata }` |
//! | `PUT` | `{ cityData: {...} }` | `{ success, insight, metadata }` |

use super::{json_response, parse_body};
use crate::ai::{CityWeatherRecord, InsightsService};
use crate::constants::llm::INSIGHTS_SOURCE;
use crate::constants::messages::{
    CITY_DATA_REQUIRED, CITY_INSIGHT_FAILED, INSIGHTS_FAILED, INSIGHTS_FAILED_DETAILS,
    INSIGHTS_KEY_MISSING, INVALID_WEATHER_DATA, NO_WEATHER_DATA,
};
use crate::constants::weather::SUMMARY_BATCH_SIZE;
use crate::context::ServerContext;
use crate::errors::AppError;
use axum::{
    body::Bytes, extract::State, http::StatusCode, response::Response, routing::get, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Insight routes
pub struct AiInsightsRoutes;

impl AiInsightsRoutes {
    /// Create the insight routes
    pub fn routes(context: Arc<ServerContext>) -> Router {
        Router::new()
            .route(
                "/api/ai-insights",
                get(Self::handle_live)
                    .post(Self::handle_posted)
                    .put(Self::handle_city),
            )
            .with_state(context)
    }

    fn error(status: StatusCode, message: &str) -> Response {
        json_response(status, json!({ "error": message }))
    }

    fn failure(message: &str, e: &AppError) -> Response {
        error!(code = ?e.code, error = %e, "{message}");
        json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": message, "details": INSIGHTS_FAILED_DETAILS }),
        )
    }

    fn service(context: &ServerContext) -> Result<&InsightsService, Response> {
        context.insights().ok_or_else(|| {
            warn!("Insights credential not configured");
            Self::error(StatusCode::INTERNAL_SERVER_ERROR, INSIGHTS_KEY_MISSING)
        })
    }

    fn metadata(context: &ServerContext) -> serde_json::Map<String, Value> {
        let mut metadata = serde_json::Map::new();
        metadata.insert("generatedAt".into(), json!(Utc::now().to_rfc3339()));
        metadata.insert("model".into(), json!(context.config().llm.model));
        metadata.insert("source".into(), json!(INSIGHTS_SOURCE));
        metadata
    }

    async fn report(
        context: &ServerContext,
        service: &InsightsService,
        records: &[CityWeatherRecord],
    ) -> Response {
        match service.generate_insights(records).await {
            Ok(insights) => {
                info!(cities = records.len(), "Insights generated");
                let mut metadata = Self::metadata(context);
                metadata.insert("citiesAnalyzed".into(), json!(records.len()));
                json_response(
                    StatusCode::OK,
                    json!({ "success": true, "insights": insights, "metadata": metadata }),
                )
            }
            Err(e) => Self::failure(INSIGHTS_FAILED, &e),
        }
    }

    async fn handle_live(State(context): State<Arc<ServerContext>>) -> Response {
        let service = match Self::service(&context) {
            Ok(service) => service,
            Err(response) => return response,
        };

        let batch = match context
            .queries()
            .multiple_cities_weather(SUMMARY_BATCH_SIZE)
            .await
        {
            Ok(batch) => batch,
            Err(e) => return Self::failure(INSIGHTS_FAILED, &e),
        };
        if batch.is_empty() {
            return Self::error(StatusCode::NOT_FOUND, NO_WEATHER_DATA);
        }

        let records: Vec<CityWeatherRecord> = batch.iter().map(CityWeatherRecord::from).collect();
        Self::report(&context, service, &records).await
    }

    async fn handle_posted(State(context): State<Arc<ServerContext>>, body: Bytes) -> Response {
        let service = match Self::service(&context) {
            Ok(service) => service,
            Err(response) => return response,
        };

        let Some(mut body) = parse_body::<Value>(&body) else {
            return Self::error(StatusCode::BAD_REQUEST, INVALID_WEATHER_DATA);
        };
        let data = match body.get_mut("weatherData").map(Value::take) {
            Some(Value::Null) | None => body
                .get_mut("airQualityData")
                .map(Value::take)
                .unwrap_or_default(),
            Some(data) => data,
        };
        if !data.is_array() {
            return Self::error(StatusCode::BAD_REQUEST, INVALID_WEATHER_DATA);
        }
        let Ok(records) = serde_json::from_value::<Vec<CityWeatherRecord>>(data) else {
            return Self::error(StatusCode::BAD_REQUEST, INVALID_WEATHER_DATA);
        };

        Self::report(&context, service, &records).await
    }

    async fn handle_city(State(context): State<Arc<ServerContext>>, body: Bytes) -> Response {
        let service = match Self::service(&context) {
            Ok(service) => service,
            Err(response) => return response,
        };

        let Some(mut body) = parse_body::<Value>(&body) else {
            return Self::error(StatusCode::BAD_REQUEST, CITY_DATA_REQUIRED);
        };
        let city_data = body
            .get_mut("cityData")
            .map(Value::take)
            .filter(|v| !v.is_null());
        let Some(record) =
            city_data.and_then(|v| serde_json::from_value::<CityWeatherRecord>(v).ok())
        else {
            return Self::error(StatusCode::BAD_REQUEST, CITY_DATA_REQUIRED);
        };

        match service.generate_city_insight(&record).await {
            Ok(Some(insight)) => {
                let mut metadata = Self::metadata(&context);
                metadata.insert("city".into(), json!(record.name()));
                json_response(
                    StatusCode::OK,
                    json!({ "success": true, "insight": insight, "metadata": metadata }),
                )
            }
            Ok(None) => Self::error(StatusCode::NOT_FOUND, CITY_INSIGHT_FAILED),
            Err(e) => Self::failure(CITY_INSIGHT_FAILED, &e),
        }
    }
}
