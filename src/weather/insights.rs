// ABOUTME: Alert classification and batch aggregation over weather snapshots
// ABOUTME: Computes per-city alert severity and the global insights summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Pure analysis over snapshots. Nothing here performs I/O.

use super::models::{
    AlertSeverity, CityExtreme, GlobalInsights, WeatherAlert, WeatherCondition, WeatherSnapshot,
};
use crate::constants::weather::{
    COLD_SEVERE_C, COLD_WARNING_C, HEAT_SEVERE_C, HEAT_WARNING_C, PRECIP_ADVISORY_MM,
    PRECIP_SEVERE_MM, PRECIP_WARNING_MM, WIND_ADVISORY_KMH, WIND_SEVERE_KMH, WIND_WARNING_KMH,
};
use chrono::{DateTime, Utc};

/// Classify a snapshot against the alert thresholds
#[must_use]
pub fn assess_alert(snapshot: &WeatherSnapshot) -> WeatherAlert {
    let mut reasons = Vec::new();
    let mut severity = AlertSeverity::None;
    let mut raise = |level: AlertSeverity, reason: String| {
        severity = severity.max(level);
        reasons.push(reason);
    };

    match snapshot.temperature {
        t if t >= HEAT_SEVERE_C => {
            raise(AlertSeverity::Severe, format!("Extreme heat at {t}°C"));
        }
        t if t >= HEAT_WARNING_C => {
            raise(AlertSeverity::Warning, format!("High heat at {t}°C"));
        }
        t if t <= COLD_SEVERE_C => {
            raise(AlertSeverity::Severe, format!("Extreme cold at {t}°C"));
        }
        t if t <= COLD_WARNING_C => {
            raise(AlertSeverity::Warning, format!("Severe cold at {t}°C"));
        }
        _ => {}
    }

    match snapshot.wind_speed {
        w if w >= WIND_SEVERE_KMH => {
            raise(AlertSeverity::Severe, format!("Storm-force wind at {w} km/h"));
        }
        w if w >= WIND_WARNING_KMH => {
            raise(AlertSeverity::Warning, format!("Gale-force wind at {w} km/h"));
        }
        w if w >= WIND_ADVISORY_KMH => {
            raise(AlertSeverity::Advisory, format!("Strong wind at {w} km/h"));
        }
        _ => {}
    }

    match snapshot.precipitation {
        p if p >= PRECIP_SEVERE_MM => raise(
            AlertSeverity::Severe,
            format!("Flooding risk from {p}mm precipitation"),
        ),
        p if p >= PRECIP_WARNING_MM => {
            raise(AlertSeverity::Warning, format!("Heavy precipitation of {p}mm"));
        }
        p if p >= PRECIP_ADVISORY_MM => raise(
            AlertSeverity::Advisory,
            format!("Significant precipitation of {p}mm"),
        ),
        _ => {}
    }

    match snapshot.condition() {
        Some(WeatherCondition::Thunderstorm) => {
            raise(AlertSeverity::Warning, "Thunderstorm activity".to_owned());
        }
        Some(
            condition @ (WeatherCondition::HeavyRain
            | WeatherCondition::Snow
            | WeatherCondition::Sleet),
        ) => {
            raise(AlertSeverity::Advisory, format!("{condition} reported"));
        }
        _ => {}
    }

    WeatherAlert {
        city: snapshot.location.clone(),
        severity,
        reasons,
        snapshot: snapshot.clone(),
    }
}

/// Aggregate a batch into [`GlobalInsights`]
///
/// An empty batch yields zero counts, a zero average and no extremes.
/// Ties on temperature keep the earliest snapshot in batch order.
#[must_use]
pub fn compute_global_insights(
    snapshots: &[WeatherSnapshot],
    generated_at: DateTime<Utc>,
) -> GlobalInsights {
    let total = snapshots.len();
    let average_temperature = if total == 0 {
        0.0
    } else {
        let sum: f64 = snapshots.iter().map(|s| s.temperature).sum();
        round_one_decimal(sum / total as f64)
    };

    let cities_with_alerts = snapshots
        .iter()
        .filter(|s| assess_alert(s).severity.is_alert())
        .count();

    let mut coolest: Option<&WeatherSnapshot> = None;
    let mut warmest: Option<&WeatherSnapshot> = None;
    for snapshot in snapshots {
        if coolest.is_none_or(|c| snapshot.temperature < c.temperature) {
            coolest = Some(snapshot);
        }
        if warmest.is_none_or(|w| snapshot.temperature > w.temperature) {
            warmest = Some(snapshot);
        }
    }

    GlobalInsights {
        total_cities_monitored: total,
        average_temperature,
        cities_with_alerts,
        coolest_city: coolest.map(to_extreme),
        warmest_city: warmest.map(to_extreme),
        generated_at,
    }
}

fn to_extreme(snapshot: &WeatherSnapshot) -> CityExtreme {
    CityExtreme {
        name: snapshot.location.clone(),
        temperature: snapshot.temperature,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
