// ABOUTME: Weather query route exposing the query layer over HTTP with optional legacy views
// ABOUTME: Dispatches on the type parameter to city, batch, insights, alert, or stats queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::tag_request_id;
use crate::constants::weather::SUMMARY_BATCH_SIZE;
use crate::context::ServerContext;
use crate::errors::{AppError, AppResult};
use crate::legacy::air_quality::{legacy_insights, legacy_view};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Query parameters of `GET /api/weather`
#[derive(Debug, Deserialize)]
struct WeatherParams {
    #[serde(rename = "type")]
    kind: Option<String>,
    city: Option<String>,
    limit: Option<usize>,
    #[serde(default)]
    legacy: bool,
}

impl WeatherParams {
    fn city(&self) -> AppResult<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::missing_field("city"))
    }
}

/// Weather routes
pub struct WeatherRoutes;

impl WeatherRoutes {
    /// Create the weather routes
    pub fn routes(context: Arc<ServerContext>) -> Router {
        Router::new()
            .route("/api/weather", get(Self::handle_weather))
            .with_state(context)
    }

    async fn handle_weather(
        State(context): State<Arc<ServerContext>>,
        headers: HeaderMap,
        Query(params): Query<WeatherParams>,
    ) -> AppResult<Json<Value>> {
        let data = Self::dispatch(&context, &params)
            .await
            .map_err(|e| tag_request_id(e, &headers))?;
        Ok(Json(json!({
            "success": true,
            "data": data,
            "timestamp": Utc::now().to_rfc3339(),
        })))
    }

    async fn dispatch(context: &ServerContext, params: &WeatherParams) -> AppResult<Value> {
        let kind = params
            .kind
            .as_deref()
            .ok_or_else(|| AppError::missing_field("type"))?;

        if params.legacy {
            let queries = context.air_quality();
            return Ok(match kind {
                "city" => json!(legacy_view(
                    &queries.get_air_quality_by_city(params.city()?).await?
                )),
                "cities" => {
                    let batch = queries
                        .get_multiple_cities_air_quality(params.limit.unwrap_or(SUMMARY_BATCH_SIZE))
                        .await?;
                    json!(batch.iter().map(legacy_view).collect::<Vec<_>>())
                }
                "global-insights" => {
                    json!(legacy_insights(&queries.get_global_air_quality_insights().await?))
                }
                "alert" => json!(queries.get_city_air_quality_alert(params.city()?).await?),
                "stats" => json!(queries.get_aqicn_api_stats().await?),
                other => return Err(unknown_type(other)),
            });
        }

        let queries = context.queries();
        Ok(match kind {
            "city" => json!(queries.weather_by_city(params.city()?).await?),
            "cities" => json!(
                queries
                    .multiple_cities_weather(params.limit.unwrap_or(SUMMARY_BATCH_SIZE))
                    .await?
            ),
            "global-insights" => json!(queries.global_weather_insights().await?),
            "alert" => json!(queries.city_weather_alert(params.city()?).await?),
            "stats" => json!(queries.weather_api_stats().await?),
            other => return Err(unknown_type(other)),
        })
    }
}

fn unknown_type(kind: &str) -> AppError {
    AppError::invalid_input(format!(
        "Unknown query type '{kind}'; expected city, cities, global-insights, alert, or stats"
    ))
}
