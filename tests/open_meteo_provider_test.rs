// ABOUTME: Integration tests for the Open-Meteo weather provider against a mock server
// ABOUTME: Covers geocoding selection, condition mapping, coordinate caching, and failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::json;
use std::num::NonZeroUsize;
use weatherdash_server::config::{WeatherConfig, WeatherSourceKind};
use weatherdash_server::errors::ErrorCode;
use weatherdash_server::weather::{OpenMeteoProvider, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenMeteoProvider {
    OpenMeteoProvider::new(&WeatherConfig {
        source: WeatherSourceKind::OpenMeteo,
        forecast_url: server.uri(),
        geocoding_url: format!("{}/", server.uri()),
        request_timeout_secs: 5,
        cities: Vec::new(),
    })
    .unwrap()
}

async fn mount_geocoding(server: &MockServer, name: &str, results: serde_json::Value, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, latitude: &str, code: i32) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", latitude))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "temperature_2m": 9.4,
                "relative_humidity_2m": 81,
                "precipitation": 0.6,
                "wind_speed_10m": 22.3,
                "surface_pressure": 1004.2,
                "weather_code": code
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_current_maps_forecast_fields() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        "London",
        json!([
            { "name": "London", "latitude": 42.98, "longitude": -81.24, "country_code": "CA" },
            { "name": "London", "latitude": 51.5, "longitude": -0.12, "country_code": "GB" }
        ]),
        1,
    )
    .await;
    mount_forecast(&server, "51.5", 61).await;

    let provider = provider_for(&server);
    let snapshot = provider.current("London, UK").await.unwrap();

    assert_eq!(snapshot.location, "London, GB");
    assert!((snapshot.temperature - 9.4).abs() < f64::EPSILON);
    assert!((snapshot.humidity - 81.0).abs() < f64::EPSILON);
    assert!((snapshot.wind_speed - 22.3).abs() < f64::EPSILON);
    assert!((snapshot.pressure - 1004.2).abs() < f64::EPSILON);
    assert_eq!(snapshot.weather_condition, "Rain");
    assert_eq!(snapshot.api_source, "Open-Meteo");
    assert_eq!(provider.name(), "Open-Meteo");
    assert!(provider.is_live());
}

#[tokio::test]
async fn test_coordinates_are_resolved_once() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        "Tokyo",
        json!([{ "name": "Tokyo", "latitude": 35.69, "longitude": 139.69, "country_code": "JP" }]),
        1,
    )
    .await;
    mount_forecast(&server, "35.69", 95).await;

    let provider = provider_for(&server);
    let first = provider.current("Tokyo").await.unwrap();
    let second = provider.current(" tokyo ").await.unwrap();

    assert_eq!(first.location, "Tokyo, JP");
    assert_eq!(second.weather_condition, "Thunderstorm");
}

#[tokio::test]
async fn test_coordinate_cache_evicts_least_recent_labels() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        "London",
        json!([{ "name": "London", "latitude": 51.5, "longitude": -0.12, "country_code": "GB" }]),
        4,
    )
    .await;
    mount_forecast(&server, "51.5", 0).await;

    let provider = provider_for(&server).with_place_capacity(NonZeroUsize::new(2).unwrap());

    // Unknown country hints still resolve to the first candidate
    for suffix in ["Z1", "Z2", "Z3"] {
        let snapshot = provider.current(&format!("London, {suffix}")).await.unwrap();
        assert_eq!(snapshot.location, "London, GB");
    }
    provider.current("London, Z3").await.unwrap();
    // Z1 was evicted when Z3 arrived, so it is geocoded again
    provider.current("London, Z1").await.unwrap();
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Atlantis", json!([]), 1).await;

    let err = provider_for(&server).current("Atlantis").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_forecast_failure_is_external_error() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        "Lima",
        json!([{ "name": "Lima", "latitude": -12.05, "longitude": -77.04, "country_code": "PE" }]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = provider_for(&server).current("Lima").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
}
