// ABOUTME: Air-quality named adapter implemented in terms of the weather query layer
// ABOUTME: Maps aqi, pollutant, and best/worst city fields onto weather fields or fixed defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Air Quality Compatibility Layer
//!
//! Older callers spoke in air-quality terms. Every operation here delegates to
//! a [`WeatherQueryApi`] unchanged, so results and errors are exactly those of
//! the weather call. Field-level compatibility goes through [`legacy_view`] and
//! [`legacy_insights`], which build fully populated structures:
//!
//! | legacy field | source |
//! |---|---|
//! | `aqi` | `temperature` |
//! | `healthLevel` | `weatherCondition` |
//! | `pm25`, `pm10`, `o3`, `no2`, `so2`, `co` | `0` |
//! | `dominantPollutant`, `dominentPollutant` | `"Unknown"` |
//! | `bestCity` / `worstCity` | `coolestCity` / `warmestCity` |
//!
//! There is no reverse mapping.

use crate::backend::{HostedBackendClient, RealtimeChannel, RealtimeWeatherPayload};
use crate::constants::weather::UNKNOWN_POLLUTANT;
use crate::errors::AppResult;
use crate::weather::{
    CityExtreme, GlobalInsights, WeatherAlert, WeatherApiStats, WeatherQueryApi,
    WeatherQueryKeys, WeatherSnapshot,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Former name of [`WeatherSnapshot`]
pub type ProcessedAirQualityData = WeatherSnapshot;

/// Former name of [`WeatherQueryKeys`]
pub type AqicnQueryKeys = WeatherQueryKeys;

/// Former name of [`RealtimeWeatherPayload`]
pub type RealtimeAirQualityPayload = RealtimeWeatherPayload;

/// Former name of [`HostedBackendClient::create_weather_channel`]
#[must_use]
pub fn create_air_quality_channel(
    backend: &HostedBackendClient,
    name: Option<&str>,
) -> Arc<RealtimeChannel> {
    backend.create_weather_channel(name)
}

/// Snapshot as legacy consumers expect to read it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySnapshot {
    /// Current weather fields, unchanged
    #[serde(flatten)]
    pub weather: WeatherSnapshot,
    /// Temperature under its old index name
    pub aqi: f64,
    /// Condition label under its old name
    pub health_level: String,
    /// Always 0
    pub pm25: f64,
    /// Always 0
    pub pm10: f64,
    /// Always 0
    pub o3: f64,
    /// Always 0
    pub no2: f64,
    /// Always 0
    pub so2: f64,
    /// Always 0
    pub co: f64,
    /// Always "Unknown"
    pub dominant_pollutant: String,
    /// Misspelled duplicate some consumers still read
    #[serde(rename = "dominentPollutant")]
    pub dominent_pollutant: String,
}

/// City extreme under legacy naming
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyCity {
    /// Location label
    pub name: String,
    /// Temperature under its old index name
    pub aqi: f64,
}

impl From<&CityExtreme> for LegacyCity {
    fn from(extreme: &CityExtreme) -> Self {
        Self {
            name: extreme.name.clone(),
            aqi: extreme.temperature,
        }
    }
}

/// Global insights under legacy naming
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyInsights {
    /// Snapshots in the batch
    pub total_cities_monitored: usize,
    /// Average temperature
    pub average_aqi: f64,
    /// Cities at warning severity or above
    pub cities_with_alerts: usize,
    /// Coolest city
    pub best_city: Option<LegacyCity>,
    /// Warmest city
    pub worst_city: Option<LegacyCity>,
    /// Computation time
    pub generated_at: DateTime<Utc>,
}

/// Project a snapshot onto the legacy field set
#[must_use]
pub fn legacy_view(snapshot: &WeatherSnapshot) -> LegacySnapshot {
    LegacySnapshot {
        weather: snapshot.clone(),
        aqi: snapshot.temperature,
        health_level: snapshot.weather_condition.clone(),
        pm25: 0.0,
        pm10: 0.0,
        o3: 0.0,
        no2: 0.0,
        so2: 0.0,
        co: 0.0,
        dominant_pollutant: UNKNOWN_POLLUTANT.to_owned(),
        dominent_pollutant: UNKNOWN_POLLUTANT.to_owned(),
    }
}

/// Project global insights onto the legacy field set
#[must_use]
pub fn legacy_insights(insights: &GlobalInsights) -> LegacyInsights {
    LegacyInsights {
        total_cities_monitored: insights.total_cities_monitored,
        average_aqi: insights.average_temperature,
        cities_with_alerts: insights.cities_with_alerts,
        best_city: insights.coolest_city.as_ref().map(LegacyCity::from),
        worst_city: insights.warmest_city.as_ref().map(LegacyCity::from),
        generated_at: insights.generated_at,
    }
}

/// Legacy query names over any weather query implementation
pub struct AirQualityQueries<Q: ?Sized> {
    inner: Arc<Q>,
}

impl<Q: ?Sized> Clone for AirQualityQueries<Q> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Q: WeatherQueryApi + ?Sized> AirQualityQueries<Q> {
    /// Wrap a weather query layer
    #[must_use]
    pub const fn new(inner: Arc<Q>) -> Self {
        Self { inner }
    }

    /// See [`WeatherQueryApi::weather_by_city`]
    ///
    /// # Errors
    ///
    /// Propagates the weather query error unchanged
    pub async fn get_air_quality_by_city(&self, city: &str) -> AppResult<ProcessedAirQualityData> {
        self.inner.weather_by_city(city).await
    }

    /// See [`WeatherQueryApi::multiple_cities_weather`]
    ///
    /// # Errors
    ///
    /// Propagates the weather query error unchanged
    pub async fn get_multiple_cities_air_quality(
        &self,
        limit: usize,
    ) -> AppResult<Vec<ProcessedAirQualityData>> {
        self.inner.multiple_cities_weather(limit).await
    }

    /// See [`WeatherQueryApi::global_weather_insights`]
    ///
    /// # Errors
    ///
    /// Propagates the weather query error unchanged
    pub async fn get_global_air_quality_insights(&self) -> AppResult<GlobalInsights> {
        self.inner.global_weather_insights().await
    }

    /// See [`WeatherQueryApi::city_weather_alert`]
    ///
    /// # Errors
    ///
    /// Propagates the weather query error unchanged
    pub async fn get_city_air_quality_alert(&self, city: &str) -> AppResult<WeatherAlert> {
        self.inner.city_weather_alert(city).await
    }

    /// See [`WeatherQueryApi::weather_api_stats`]
    ///
    /// # Errors
    ///
    /// Propagates the weather query error unchanged
    pub async fn get_aqicn_api_stats(&self) -> AppResult<WeatherApiStats> {
        self.inner.weather_api_stats().await
    }
}
