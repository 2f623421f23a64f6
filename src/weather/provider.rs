// ABOUTME: Weather provider trait implemented by the live API client and the hosted table reader
// ABOUTME: The query layer depends on this seam rather than on a concrete provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::models::WeatherSnapshot;
use crate::errors::AppResult;
use async_trait::async_trait;

/// Source of current weather snapshots
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Name reported as `apiSource` in statistics
    fn name(&self) -> &str;

    /// Whether snapshots come from a live upstream rather than the hosted table
    ///
    /// Only live snapshots are written through to the hosted backend.
    fn is_live(&self) -> bool {
        true
    }

    /// Fetch the current weather for a `"City"` or `"City, CC"` label
    async fn current(&self, city: &str) -> AppResult<WeatherSnapshot>;
}
