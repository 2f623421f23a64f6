// ABOUTME: Weather domain constants (batch sizes, city catalogs, alert thresholds)
// ABOUTME: Thresholds drive severity classification for city alerts and insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cities fetched for chat context and global insights
pub const SUMMARY_BATCH_SIZE: usize = 10;

/// Cities monitored when `WEATHER_CITIES` is not set
pub const DEFAULT_MONITORED_CITIES: [&str; 10] = [
    "London, GB",
    "New York, US",
    "Tokyo, JP",
    "Paris, FR",
    "Shanghai, CN",
    "Delhi, IN",
    "Sydney, AU",
    "São Paulo, BR",
    "Cairo, EG",
    "Moscow, RU",
];

/// Cities shown on the monitoring dashboard
pub const DEFAULT_DASHBOARD_CITIES: [&str; 6] =
    ["London", "New York", "Tokyo", "Paris", "Shanghai", "Delhi"];

/// Label used when a provider cannot name a pollutant
pub const UNKNOWN_POLLUTANT: &str = "Unknown";

/// Source label for snapshots fetched from Open-Meteo
pub const OPEN_METEO_SOURCE: &str = "Open-Meteo";

/// Open-Meteo forecast API base URL
pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1";

/// Open-Meteo geocoding API base URL
pub const OPEN_METEO_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";

/// Outbound weather request timeout in seconds
pub const WEATHER_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Heat thresholds in °C
pub const HEAT_WARNING_C: f64 = 35.0;
/// Severe heat threshold in °C
pub const HEAT_SEVERE_C: f64 = 40.0;
/// Cold warning threshold in °C
pub const COLD_WARNING_C: f64 = -10.0;
/// Severe cold threshold in °C
pub const COLD_SEVERE_C: f64 = -20.0;

/// Wind advisory threshold in km/h
pub const WIND_ADVISORY_KMH: f64 = 40.0;
/// Wind warning threshold in km/h
pub const WIND_WARNING_KMH: f64 = 60.0;
/// Severe wind threshold in km/h
pub const WIND_SEVERE_KMH: f64 = 90.0;

/// Precipitation advisory threshold in mm
pub const PRECIP_ADVISORY_MM: f64 = 10.0;
/// Precipitation warning threshold in mm
pub const PRECIP_WARNING_MM: f64 = 20.0;
/// Severe precipitation threshold in mm
pub const PRECIP_SEVERE_MM: f64 = 50.0;
