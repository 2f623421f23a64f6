// ABOUTME: Hosted backend client for the managed database and its realtime channels
// ABOUTME: Constructed once at startup and injected into every collaborator that needs it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Hosted Backend Client
//!
//! Talks to the hosted database through its PostgREST surface
//! (`{url}/rest/v1/{table}`) with the project's anon key, and hands out named
//! realtime channels. There is exactly one instance per process, owned by the
//! server context and shared through `Arc`.

/// Realtime change-event channels
pub mod realtime;

pub use realtime::{
    ChangeEventType, RealtimeChannel, RealtimeError, RealtimeHub, RealtimeWeatherPayload,
};

use crate::config::HostedBackendConfig;
use crate::constants::backend::{
    BACKEND_REQUEST_TIMEOUT_SECS, CHANNEL_CAPACITY, DEFAULT_WEATHER_CHANNEL,
};
use crate::errors::{AppError, AppResult};
use crate::weather::{country_hint, short_name, WeatherSnapshot};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Service name used in error messages
const SERVICE: &str = "HostedBackend";

/// Row layout of the weather table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeatherRow {
    location: String,
    temperature: f64,
    humidity: f64,
    precipitation: f64,
    wind_speed: f64,
    pressure: f64,
    weather_condition: String,
    timestamp: DateTime<Utc>,
    api_source: String,
}

impl From<&WeatherSnapshot> for WeatherRow {
    fn from(s: &WeatherSnapshot) -> Self {
        Self {
            location: s.location.clone(),
            temperature: s.temperature,
            humidity: s.humidity,
            precipitation: s.precipitation,
            wind_speed: s.wind_speed,
            pressure: s.pressure,
            weather_condition: s.weather_condition.clone(),
            timestamp: s.timestamp,
            api_source: s.api_source.clone(),
        }
    }
}

impl From<WeatherRow> for WeatherSnapshot {
    fn from(r: WeatherRow) -> Self {
        Self {
            location: r.location,
            temperature: r.temperature,
            humidity: r.humidity,
            precipitation: r.precipitation,
            wind_speed: r.wind_speed,
            pressure: r.pressure,
            weather_condition: r.weather_condition,
            timestamp: r.timestamp,
            api_source: r.api_source,
        }
    }
}

/// Drop characters that act as wildcards or filter syntax in a PostgREST `ilike`
fn like_literal(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '%' | '_' | '"' | '\\' | '(' | ')' | ','))
        .collect()
}

/// True when a stored `location` names the requested city
fn same_place(location: &str, city: &str, hint: Option<&str>) -> bool {
    short_name(location).to_lowercase() == short_name(city).to_lowercase()
        && !hint.is_some_and(|cc| country_hint(location).as_deref() != Some(cc))
}

/// Client for the hosted database and realtime service
pub struct HostedBackendClient {
    http: Client,
    config: HostedBackendConfig,
    realtime: RealtimeHub,
}

impl HostedBackendClient {
    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: HostedBackendConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(BACKEND_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        let realtime = RealtimeHub::new(CHANNEL_CAPACITY, config.events_per_second);
        Ok(Self {
            http,
            config,
            realtime,
        })
    }

    /// Weather table name
    #[must_use]
    pub fn weather_table(&self) -> &str {
        &self.config.weather_table
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    /// Most recent row for a city, matched case-insensitively on the name
    ///
    /// A `"Name, CC"` label only matches rows in that country. A bare name
    /// matches `Name` or any `Name, ..` row, never a longer name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it
    #[instrument(skip(self), fields(table = %self.config.weather_table))]
    pub async fn latest_weather(&self, city: &str) -> AppResult<Option<WeatherSnapshot>> {
        let name = like_literal(short_name(city));
        let hint = country_hint(city);
        let filter = hint.as_deref().map_or_else(
            || {
                format!(
                    "or={}",
                    urlencoding::encode(&format!(
                        "(location.ilike.\"{name}\",location.ilike.\"{name},*\")"
                    ))
                )
            },
            |cc| {
                format!(
                    "location={}",
                    urlencoding::encode(&format!("ilike.{name},*{}", like_literal(cc)))
                )
            },
        );
        let url = format!(
            "{}?select=*&{filter}&order=timestamp.desc&limit=1",
            self.table_url(&self.config.weather_table),
        );
        let response = self.authorized(self.http.get(&url)).send().await?;
        if !response.status().is_success() {
            return Err(AppError::external_service(
                SERVICE,
                format!("Select returned {}", response.status()),
            ));
        }
        let rows: Vec<WeatherRow> = response.json().await?;
        let row = rows
            .into_iter()
            .next()
            .filter(|row| same_place(&row.location, city, hint.as_deref()));
        debug!(city, found = row.is_some(), "Fetched hosted weather row");
        Ok(row.map(WeatherSnapshot::from))
    }

    /// Insert or replace the row for the snapshot's location
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it
    #[instrument(skip(self, snapshot), fields(table = %self.config.weather_table, location = %snapshot.location))]
    pub async fn upsert_weather(&self, snapshot: &WeatherSnapshot) -> AppResult<()> {
        let url = format!(
            "{}?on_conflict=location",
            self.table_url(&self.config.weather_table)
        );
        let response = self
            .authorized(self.http.post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[WeatherRow::from(snapshot)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::external_service(
                SERVICE,
                format!("Upsert returned {}", response.status()),
            ));
        }
        Ok(())
    }

    /// Get or create a realtime channel
    #[must_use]
    pub fn channel(&self, name: &str) -> Arc<RealtimeChannel> {
        self.realtime.channel(name)
    }

    /// Channel for weather change events, `weather-updates` by default
    #[must_use]
    pub fn create_weather_channel(&self, name: Option<&str>) -> Arc<RealtimeChannel> {
        self.channel(name.unwrap_or(DEFAULT_WEATHER_CHANNEL))
    }

    /// Names of the open channels
    #[must_use]
    pub fn channel_names(&self) -> Vec<String> {
        self.realtime.channel_names()
    }
}
