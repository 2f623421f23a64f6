// ABOUTME: Weather domain module: models, providers, query cache, and the query layer
// ABOUTME: Every consumer reads weather through the WeatherQueryApi trait defined here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Query keys and the in-memory query cache
pub mod cache;
/// Reader for the hosted weather table
pub mod hosted;
/// Alert classification and global aggregation
pub mod insights;
/// Snapshot, alert, insights, and statistics types
pub mod models;
/// Open-Meteo client
pub mod open_meteo;
/// Provider trait
pub mod provider;
/// Cached query layer
pub mod queries;
/// Usage counters
pub mod stats;

pub use cache::{QueryCache, QueryCacheConfig, QueryKey, WeatherQueryKeys};
pub use hosted::HostedTableProvider;
pub use insights::{assess_alert, compute_global_insights};
pub use models::{
    country_hint, short_name, AlertSeverity, CityExtreme, GlobalInsights, WeatherAlert,
    WeatherApiStats, WeatherCondition, WeatherSnapshot,
};
pub use open_meteo::OpenMeteoProvider;
pub use provider::WeatherProvider;
pub use queries::{WeatherQueries, WeatherQueryApi};
pub use stats::QueryStats;
