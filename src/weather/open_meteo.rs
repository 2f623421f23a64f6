// ABOUTME: Open-Meteo weather provider using the free geocoding and forecast APIs
// ABOUTME: Resolves city labels to coordinates and maps current conditions to snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Open-Meteo provider.
//!
//! Two calls per uncached city: `GET {geocoding}/search?name=..` resolves the
//! label to coordinates (cached for the life of the process), then
//! `GET {forecast}/forecast?latitude=..&longitude=..&current=..` returns the
//! current conditions. No API key is required.

use super::models::{country_hint, short_name, WeatherCondition, WeatherSnapshot};
use super::provider::WeatherProvider;
use crate::config::WeatherConfig;
use crate::constants::cache::GEOCODING_CACHE_CAPACITY;
use crate::constants::weather::OPEN_METEO_SOURCE;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use lru::LruCache;
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,surface_pressure,weather_code";

/// Geocoding candidates requested per lookup
const GEOCODING_CANDIDATES: u8 = 10;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: ForecastCurrent,
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    #[serde(default)]
    temperature_2m: f64,
    #[serde(default)]
    relative_humidity_2m: f64,
    #[serde(default)]
    precipitation: f64,
    #[serde(default)]
    wind_speed_10m: f64,
    #[serde(default)]
    surface_pressure: f64,
    #[serde(default)]
    weather_code: i32,
}

/// Resolved coordinates for a city label
#[derive(Debug, Clone)]
struct Place {
    label: String,
    latitude: f64,
    longitude: f64,
}

/// Live weather from Open-Meteo
pub struct OpenMeteoProvider {
    client: Client,
    forecast_url: String,
    geocoding_url: String,
    places: Mutex<LruCache<String, Place>>,
}

impl OpenMeteoProvider {
    /// Build a provider from weather settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("weatherdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            forecast_url: config.forecast_url.trim_end_matches('/').to_owned(),
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_owned(),
            places: Mutex::new(LruCache::new(Self::DEFAULT_PLACE_CAPACITY)),
        })
    }

    const DEFAULT_PLACE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(GEOCODING_CACHE_CAPACITY)
    {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    };

    /// Keep at most `capacity` resolved labels, evicting the least recently used
    #[must_use]
    pub fn with_place_capacity(self, capacity: NonZeroUsize) -> Self {
        Self {
            places: Mutex::new(LruCache::new(capacity)),
            ..self
        }
    }

    async fn resolve(&self, city: &str) -> AppResult<Place> {
        let key = city.trim().to_lowercase();
        let cached = self.places.lock().await.get(&key).cloned();
        if let Some(place) = cached {
            return Ok(place);
        }

        let name = short_name(city);
        let hint = country_hint(city);

        let url = format!(
            "{}/search?name={}&count={GEOCODING_CANDIDATES}&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name)
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::external_service(
                OPEN_METEO_SOURCE,
                format!("Geocoding returned {}", response.status()),
            ));
        }
        let geocoding: GeocodingResponse = response.json().await?;

        let chosen = select_candidate(geocoding.results, hint.as_deref())
            .ok_or_else(|| AppError::not_found(format!("City '{city}'")))?;

        let label = chosen.country_code.as_deref().map_or_else(
            || chosen.name.clone(),
            |cc| format!("{}, {cc}", chosen.name),
        );
        let place = Place {
            label,
            latitude: chosen.latitude,
            longitude: chosen.longitude,
        };
        debug!(city, label = %place.label, "Resolved city coordinates");
        self.places.lock().await.put(key, place.clone());
        Ok(place)
    }
}

/// Prefer the first candidate in the hinted country, else the first overall
fn select_candidate(results: Vec<GeocodingResult>, hint: Option<&str>) -> Option<GeocodingResult> {
    let Some(hint) = hint else {
        return results.into_iter().next();
    };
    let mut fallback = None;
    for result in results {
        let matches = result
            .country_code
            .as_deref()
            .is_some_and(|cc| cc.eq_ignore_ascii_case(hint));
        if matches {
            return Some(result);
        }
        if fallback.is_none() {
            fallback = Some(result);
        }
    }
    if fallback.is_some() {
        warn!(hint, "No geocoding candidate in hinted country, using first result");
    }
    fallback
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn name(&self) -> &str {
        OPEN_METEO_SOURCE
    }

    #[instrument(skip(self), fields(provider = OPEN_METEO_SOURCE))]
    async fn current(&self, city: &str) -> AppResult<WeatherSnapshot> {
        let place = self.resolve(city).await?;

        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={CURRENT_FIELDS}&wind_speed_unit=kmh&timezone=UTC",
            self.forecast_url, place.latitude, place.longitude
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::external_service(
                OPEN_METEO_SOURCE,
                format!("Forecast returned {}", response.status()),
            ));
        }
        let forecast: ForecastResponse = response.json().await?;
        let current = forecast.current;

        Ok(WeatherSnapshot {
            location: place.label,
            temperature: current.temperature_2m,
            humidity: current.relative_humidity_2m,
            precipitation: current.precipitation,
            wind_speed: current.wind_speed_10m,
            pressure: current.surface_pressure,
            weather_condition: WeatherCondition::from_wmo_code(current.weather_code)
                .label()
                .to_owned(),
            timestamp: Utc::now(),
            api_source: OPEN_METEO_SOURCE.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, cc: &str) -> GeocodingResult {
        GeocodingResult {
            name: name.to_owned(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: Some(cc.to_owned()),
        }
    }

    #[test]
    fn test_select_candidate_honors_country_hint() {
        let results = vec![candidate("London", "CA"), candidate("London", "GB")];
        let chosen = select_candidate(results, country_hint("London, UK").as_deref()).unwrap();
        assert_eq!(chosen.country_code.as_deref(), Some("GB"));
    }

    #[test]
    fn test_select_candidate_falls_back_to_first() {
        let results = vec![candidate("Paris", "FR"), candidate("Paris", "US")];
        let chosen = select_candidate(results, Some("DE")).unwrap();
        assert_eq!(chosen.country_code.as_deref(), Some("FR"));
        assert!(select_candidate(Vec::new(), None).is_none());
    }
}
