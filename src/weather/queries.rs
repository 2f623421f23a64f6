// ABOUTME: Weather query layer with cached lookups, batch fetches, insights, alerts, and stats
// ABOUTME: Writes live snapshots through to the hosted backend and publishes change events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Weather Query Layer
//!
//! [`WeatherQueryApi`] is the single versioned interface every consumer uses:
//! HTTP routes, the AI handlers, the dashboard pollers and the legacy adapter.
//! [`WeatherQueries`] implements it over a [`WeatherProvider`] with a
//! [`QueryCache`] in front.
//!
//! Batch fetches run the per-city lookups concurrently and fail as a whole if
//! any city fails. Only one batch fetch runs at a time; callers that arrive
//! while it is in flight wait and read its cached result.

use super::cache::{QueryCache, QueryKey, WeatherQueryKeys};
use super::insights::{assess_alert, compute_global_insights};
use super::models::{GlobalInsights, WeatherAlert, WeatherApiStats, WeatherSnapshot};
use super::provider::WeatherProvider;
use super::stats::QueryStats;
use crate::backend::{HostedBackendClient, RealtimeWeatherPayload};
use crate::constants::cache::{
    RECENT_READINGS_CAPACITY, TTL_ALERT_SECS, TTL_CITY_WEATHER_SECS, TTL_GLOBAL_INSIGHTS_SECS,
    TTL_MULTIPLE_CITIES_SECS,
};
use crate::constants::weather::SUMMARY_BATCH_SIZE;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::try_join_all;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Typed weather queries
#[async_trait]
pub trait WeatherQueryApi: Send + Sync {
    /// Current weather for one city
    async fn weather_by_city(&self, city: &str) -> AppResult<WeatherSnapshot>;

    /// Current weather for the first `limit` monitored cities, in catalog order
    async fn multiple_cities_weather(&self, limit: usize) -> AppResult<Vec<WeatherSnapshot>>;

    /// Aggregate over the standard summary batch
    async fn global_weather_insights(&self) -> AppResult<GlobalInsights>;

    /// Alert assessment for one city
    async fn city_weather_alert(&self, city: &str) -> AppResult<WeatherAlert>;

    /// Usage counters
    async fn weather_api_stats(&self) -> AppResult<WeatherApiStats>;
}

/// Cached query layer over a weather provider
pub struct WeatherQueries {
    provider: Arc<dyn WeatherProvider>,
    cache: QueryCache,
    stats: QueryStats,
    cities: Vec<String>,
    backend: Option<Arc<HostedBackendClient>>,
    /// Held while a batch is fetched from the provider
    batch_flight: Mutex<()>,
    /// Last written readings per resolved location
    last_seen: Mutex<LruCache<String, WeatherSnapshot>>,
}

impl WeatherQueries {
    /// Create a query layer for the given city catalog
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>, cities: Vec<String>, cache: QueryCache) -> Self {
        Self {
            provider,
            cache,
            stats: QueryStats::default(),
            cities,
            backend: None,
            batch_flight: Mutex::new(()),
            last_seen: Mutex::new(LruCache::new(Self::LAST_SEEN_CAPACITY)),
        }
    }

    const LAST_SEEN_CAPACITY: NonZeroUsize = match NonZeroUsize::new(RECENT_READINGS_CAPACITY) {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    };

    /// Persist live snapshots and publish change events through `backend`
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<HostedBackendClient>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Monitored city catalog
    #[must_use]
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Drop cached data under `key`, forcing the next query to refetch
    pub async fn invalidate(&self, key: &QueryKey) -> usize {
        self.cache.invalidate_prefix(key).await
    }

    async fn cached<T>(&self, key: &QueryKey) -> AppResult<Option<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let value = self.cache.get(key).await?;
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(value)
    }

    async fn city_snapshot(&self, city: &str) -> AppResult<WeatherSnapshot> {
        let key = WeatherQueryKeys::city(city);
        if let Some(snapshot) = self.cached(&key).await? {
            return Ok(snapshot);
        }

        let snapshot = self.provider.current(city).await.inspect_err(|e| {
            self.stats.record_upstream_error();
            warn!(city, error = %e, "Weather provider request failed");
        })?;
        self.cache
            .set(&key, &snapshot, Duration::from_secs(TTL_CITY_WEATHER_SECS))
            .await?;
        self.write_through(city, &snapshot).await;
        Ok(snapshot)
    }

    async fn batch(&self, limit: usize) -> AppResult<Vec<WeatherSnapshot>> {
        let key = WeatherQueryKeys::multiple_cities(limit);
        if let Some(batch) = self.cached(&key).await? {
            return Ok(batch);
        }

        let _flight = self.batch_flight.lock().await;
        if let Some(batch) = self.cache.get(&key).await? {
            debug!(limit, "Batch filled by a concurrent fetch");
            return Ok(batch);
        }

        let lookups = self
            .cities
            .iter()
            .take(limit)
            .map(|city| self.city_snapshot(city));
        let batch = try_join_all(lookups).await?;
        self.cache
            .set(&key, &batch, Duration::from_secs(TTL_MULTIPLE_CITIES_SECS))
            .await?;
        Ok(batch)
    }

    /// Persist and announce a fresh live snapshot; failures are logged only
    async fn write_through(&self, city: &str, snapshot: &WeatherSnapshot) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if !self.provider.is_live() {
            return;
        }

        let previous = self
            .last_seen
            .lock()
            .await
            .put(snapshot.location.to_lowercase(), snapshot.clone());
        if previous.as_ref().is_some_and(|p| p.same_readings(snapshot)) {
            debug!(city, "Readings unchanged, skipping write-through");
            return;
        }

        if let Err(e) = backend.upsert_weather(snapshot).await {
            warn!(city, error = %e, "Failed to persist weather snapshot");
        }

        let payload = RealtimeWeatherPayload::for_change(snapshot.clone(), previous);
        if let Err(e) = backend.create_weather_channel(None).publish(payload).await {
            warn!(city, error = %e, "Dropped weather change event");
        }
    }
}

#[async_trait]
impl WeatherQueryApi for WeatherQueries {
    #[instrument(skip(self))]
    async fn weather_by_city(&self, city: &str) -> AppResult<WeatherSnapshot> {
        self.stats.record_request();
        if city.trim().is_empty() {
            return Err(AppError::invalid_input("City name must not be empty"));
        }
        self.city_snapshot(city).await
    }

    #[instrument(skip(self))]
    async fn multiple_cities_weather(&self, limit: usize) -> AppResult<Vec<WeatherSnapshot>> {
        self.stats.record_request();
        self.batch(limit).await
    }

    #[instrument(skip(self))]
    async fn global_weather_insights(&self) -> AppResult<GlobalInsights> {
        self.stats.record_request();
        let key = WeatherQueryKeys::global_insights();
        if let Some(insights) = self.cached(&key).await? {
            return Ok(insights);
        }

        let batch = self.batch(SUMMARY_BATCH_SIZE).await?;
        let insights = compute_global_insights(&batch, Utc::now());
        self.cache
            .set(&key, &insights, Duration::from_secs(TTL_GLOBAL_INSIGHTS_SECS))
            .await?;
        Ok(insights)
    }

    #[instrument(skip(self))]
    async fn city_weather_alert(&self, city: &str) -> AppResult<WeatherAlert> {
        self.stats.record_request();
        if city.trim().is_empty() {
            return Err(AppError::invalid_input("City name must not be empty"));
        }
        let key = WeatherQueryKeys::alert(city);
        if let Some(alert) = self.cached(&key).await? {
            return Ok(alert);
        }

        let alert = assess_alert(&self.city_snapshot(city).await?);
        self.cache
            .set(&key, &alert, Duration::from_secs(TTL_ALERT_SECS))
            .await?;
        Ok(alert)
    }

    async fn weather_api_stats(&self) -> AppResult<WeatherApiStats> {
        self.stats.record_request();
        Ok(self.stats.snapshot(self.provider.name()))
    }
}
