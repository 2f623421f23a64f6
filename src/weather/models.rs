// ABOUTME: Weather data model shared by providers, queries, AI handlers, and the dashboard
// ABOUTME: Defines snapshots, condition labels, global insights, alerts, and API statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current weather for one city, as returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// `"City, CC"` label
    pub location: String,
    /// Air temperature in °C
    pub temperature: f64,
    /// Relative humidity, 0-100
    pub humidity: f64,
    /// Precipitation in mm
    pub precipitation: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Surface pressure in hPa
    pub pressure: f64,
    /// Condition label, see [`WeatherCondition::label`]
    pub weather_condition: String,
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Provider that produced the snapshot
    pub api_source: String,
}

impl WeatherSnapshot {
    /// City name without the country hint
    #[must_use]
    pub fn city_name(&self) -> &str {
        short_name(&self.location)
    }

    /// Parsed condition, `None` for labels no variant recognizes
    #[must_use]
    pub fn condition(&self) -> Option<WeatherCondition> {
        WeatherCondition::from_label(&self.weather_condition)
    }

    /// True when every measured value matches `other`
    #[must_use]
    pub fn same_readings(&self, other: &Self) -> bool {
        self.location == other.location
            && (self.temperature - other.temperature).abs() < f64::EPSILON
            && (self.humidity - other.humidity).abs() < f64::EPSILON
            && (self.precipitation - other.precipitation).abs() < f64::EPSILON
            && (self.wind_speed - other.wind_speed).abs() < f64::EPSILON
            && (self.pressure - other.pressure).abs() < f64::EPSILON
            && self.weather_condition == other.weather_condition
    }
}

/// Text before the first comma, trimmed
#[must_use]
pub fn short_name(location: &str) -> &str {
    location.split(',').next().unwrap_or(location).trim()
}

/// Uppercased country part of a `"Name, CC"` label, with UK read as GB
#[must_use]
pub fn country_hint(location: &str) -> Option<String> {
    let (_, rest) = location.split_once(',')?;
    let hint = rest.trim().to_uppercase();
    match hint.as_str() {
        "" => None,
        "UK" => Some("GB".to_owned()),
        _ => Some(hint),
    }
}

/// Weather condition categories derived from WMO weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    /// Clear sky
    Clear,
    /// Mainly clear to partly cloudy
    PartlyCloudy,
    /// Overcast
    Cloudy,
    /// Fog or depositing rime fog
    Fog,
    /// Light to dense drizzle
    Drizzle,
    /// Slight to moderate rain
    Rain,
    /// Heavy rain or violent showers
    HeavyRain,
    /// Snow fall, grains, or showers
    Snow,
    /// Freezing drizzle or rain
    Sleet,
    /// Thunderstorm, with or without hail
    Thunderstorm,
}

impl WeatherCondition {
    /// Map a WMO weather interpretation code
    #[must_use]
    pub const fn from_wmo_code(code: i32) -> Self {
        match code {
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 | 66 | 67 => Self::Sleet,
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear,
        }
    }

    /// Display label stored in snapshots
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Parse a label, accepting the adjective forms older rows used
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "clear" | "sunny" => Some(Self::Clear),
            "partly cloudy" | "partly-cloudy" | "mainly clear" => Some(Self::PartlyCloudy),
            "cloudy" | "overcast" => Some(Self::Cloudy),
            "fog" | "foggy" | "mist" => Some(Self::Fog),
            "drizzle" => Some(Self::Drizzle),
            "rain" | "rainy" | "showers" => Some(Self::Rain),
            "heavy rain" => Some(Self::HeavyRain),
            "snow" | "snowy" => Some(Self::Snow),
            "sleet" | "freezing rain" => Some(Self::Sleet),
            "thunderstorm" | "stormy" | "storm" => Some(Self::Thunderstorm),
            _ => None,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named temperature extreme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityExtreme {
    /// Location label
    pub name: String,
    /// Temperature in °C
    pub temperature: f64,
}

/// Aggregate statistics over a batch of snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalInsights {
    /// Snapshots in the batch
    pub total_cities_monitored: usize,
    /// Mean temperature rounded to one decimal
    pub average_temperature: f64,
    /// Cities whose alert severity is at least a warning
    pub cities_with_alerts: usize,
    /// Lowest temperature in the batch
    pub coolest_city: Option<CityExtreme>,
    /// Highest temperature in the batch
    pub warmest_city: Option<CityExtreme>,
    /// Computation time
    pub generated_at: DateTime<Utc>,
}

/// Alert severity, ordered from harmless to dangerous
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Nothing notable
    None,
    /// Worth knowing about
    Advisory,
    /// Conditions that disrupt plans
    Warning,
    /// Dangerous conditions
    Severe,
}

impl AlertSeverity {
    /// Whether this level counts toward `citiesWithAlerts`
    #[must_use]
    pub const fn is_alert(self) -> bool {
        matches!(self, Self::Warning | Self::Severe)
    }
}

/// Alert assessment for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlert {
    /// Location label
    pub city: String,
    /// Highest severity among the triggered rules
    pub severity: AlertSeverity,
    /// One sentence per triggered rule
    pub reasons: Vec<String>,
    /// Snapshot the assessment ran on
    pub snapshot: WeatherSnapshot,
}

/// Usage counters of the query layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherApiStats {
    /// Query calls served
    pub total_requests: u64,
    /// Cache lookups that found a live entry
    pub cache_hits: u64,
    /// Cache lookups that found nothing
    ///
    /// Counted per key level, so a cold insights query over `n` cities
    /// records `n + 2` misses: insights, batch and each city.
    pub cache_misses: u64,
    /// Provider calls that failed
    pub upstream_errors: u64,
    /// Provider name
    pub api_source: String,
    /// Most recent query time
    pub last_request_at: Option<DateTime<Utc>>,
}
