// ABOUTME: Pure display derivations for weather cards and the global insights widget
// ABOUTME: Temperature color bands, condition badges, feels-like values, and view models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::weather::{CityExtreme, GlobalInsights, WeatherSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

/// Temperature bucket with its display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    /// <= 0 °C
    Freezing,
    /// <= 15 °C
    Cold,
    /// <= 25 °C
    Mild,
    /// <= 30 °C
    Warm,
    /// <= 35 °C
    Hot,
    /// Above 35 °C
    Extreme,
}

impl TemperatureBand {
    /// Text color for the band
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Freezing => "blue",
            Self::Cold => "cyan",
            Self::Mild => "green",
            Self::Warm => "yellow",
            Self::Hot => "orange",
            Self::Extreme => "red",
        }
    }
}

/// Bucket a temperature; bounds are inclusive upper limits
#[must_use]
pub fn temperature_band(temperature: f64) -> TemperatureBand {
    match temperature {
        t if t <= 0.0 => TemperatureBand::Freezing,
        t if t <= 15.0 => TemperatureBand::Cold,
        t if t <= 25.0 => TemperatureBand::Mild,
        t if t <= 30.0 => TemperatureBand::Warm,
        t if t <= 35.0 => TemperatureBand::Hot,
        _ => TemperatureBand::Extreme,
    }
}

/// Badge color for a condition label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    /// Clear skies
    Yellow,
    /// Clouds and anything unrecognized
    Gray,
    /// Rain
    Blue,
    /// Storms
    Purple,
    /// Snow
    Cyan,
    /// Fog
    Slate,
}

/// Map a condition label to its badge color, case-insensitively
#[must_use]
pub fn condition_badge(condition: &str) -> BadgeColor {
    match condition.trim().to_lowercase().as_str() {
        "clear" | "sunny" => BadgeColor::Yellow,
        "rainy" | "rain" => BadgeColor::Blue,
        "stormy" | "thunderstorm" => BadgeColor::Purple,
        "snowy" | "snow" => BadgeColor::Cyan,
        "foggy" | "fog" => BadgeColor::Slate,
        _ => BadgeColor::Gray,
    }
}

/// Apparent temperature, `temperature + 0.1 * wind_speed`, rounded half up
#[must_use]
pub fn feels_like(temperature: f64, wind_speed: f64) -> i64 {
    0.1f64.mul_add(wind_speed, temperature + 0.5).floor() as i64
}

/// Rendered weather card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCardView {
    /// Location label
    pub location: String,
    /// °C
    pub temperature: f64,
    /// Temperature bucket
    pub temperature_band: TemperatureBand,
    /// Text color of the temperature
    pub temperature_color: &'static str,
    /// Rounded apparent temperature
    pub feels_like: i64,
    /// Condition label
    pub condition: String,
    /// Condition label, upper-cased
    pub condition_tag: String,
    /// Badge color for the condition
    pub badge_color: BadgeColor,
    /// %
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    /// hPa
    pub pressure: f64,
    /// mm
    pub precipitation: f64,
    /// Provider of the reading
    pub api_source: String,
    /// Observation time
    pub observed_at: DateTime<Utc>,
}

impl From<&WeatherSnapshot> for WeatherCardView {
    fn from(s: &WeatherSnapshot) -> Self {
        let band = temperature_band(s.temperature);
        Self {
            location: s.location.clone(),
            temperature: s.temperature,
            temperature_band: band,
            temperature_color: band.color(),
            feels_like: feels_like(s.temperature, s.wind_speed),
            condition: s.weather_condition.clone(),
            condition_tag: s.weather_condition.to_uppercase(),
            badge_color: condition_badge(&s.weather_condition),
            humidity: s.humidity,
            wind_speed: s.wind_speed,
            pressure: s.pressure,
            precipitation: s.precipitation,
            api_source: s.api_source.clone(),
            observed_at: s.timestamp,
        }
    }
}

/// Rendered global insights widget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalInsightsView {
    /// Cities in the batch
    pub total_cities_monitored: usize,
    /// °C, one decimal
    pub average_temperature: f64,
    /// Cities at warning severity or above
    pub cities_with_alerts: usize,
    /// Coolest city name
    pub coolest_city: String,
    /// Coolest temperature
    pub coolest_temperature: Option<f64>,
    /// Warmest city name
    pub warmest_city: String,
    /// Warmest temperature
    pub warmest_temperature: Option<f64>,
    /// Banner shown when any city has an alert
    pub alert_banner: Option<String>,
    /// Computation time
    pub generated_at: DateTime<Utc>,
}

impl From<&GlobalInsights> for GlobalInsightsView {
    fn from(i: &GlobalInsights) -> Self {
        let name = |c: Option<&CityExtreme>| {
            c.map_or_else(|| NOT_AVAILABLE.to_owned(), |c| c.name.clone())
        };
        Self {
            total_cities_monitored: i.total_cities_monitored,
            average_temperature: i.average_temperature,
            cities_with_alerts: i.cities_with_alerts,
            coolest_city: name(i.coolest_city.as_ref()),
            coolest_temperature: i.coolest_city.as_ref().map(|c| c.temperature),
            warmest_city: name(i.warmest_city.as_ref()),
            warmest_temperature: i.warmest_city.as_ref().map(|c| c.temperature),
            alert_banner: (i.cities_with_alerts > 0).then(|| {
                format!(
                    "{} cities currently have severe weather conditions. \
                     Stay informed and take necessary precautions.",
                    i.cities_with_alerts
                )
            }),
            generated_at: i.generated_at,
        }
    }
}
