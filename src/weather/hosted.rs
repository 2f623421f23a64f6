// ABOUTME: Weather provider that reads cached rows from the hosted backend table
// ABOUTME: Used when WEATHER_SOURCE=hosted so no live upstream is contacted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::models::WeatherSnapshot;
use super::provider::WeatherProvider;
use crate::backend::HostedBackendClient;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Reads the latest row per city from the hosted weather table
pub struct HostedTableProvider {
    backend: Arc<HostedBackendClient>,
}

impl HostedTableProvider {
    /// Wrap the shared backend client
    #[must_use]
    pub const fn new(backend: Arc<HostedBackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl WeatherProvider for HostedTableProvider {
    fn name(&self) -> &str {
        self.backend.weather_table()
    }

    fn is_live(&self) -> bool {
        false
    }

    async fn current(&self, city: &str) -> AppResult<WeatherSnapshot> {
        self.backend
            .latest_weather(city)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Weather data for '{city}'")))
    }
}
