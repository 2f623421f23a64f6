// ABOUTME: CORS middleware configuration for the HTTP API
// ABOUTME: Builds a tower-http CorsLayer from the configured origin list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::REQUEST_ID_HEADER;
use crate::config::HttpConfig;
use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS from `CORS_ALLOWED_ORIGINS`
///
/// An empty list or a `*` entry allows any origin. Entries that are not valid
/// header values are skipped; if none remain, any origin is allowed.
///
/// ```bash
/// export CORS_ALLOWED_ORIGINS="https://weather.example.com,https://admin.example.com"
/// ```
#[must_use]
pub fn setup_cors(config: &HttpConfig) -> CorsLayer {
    let wildcard = config.cors_allowed_origins.is_empty()
        || config.cors_allowed_origins.iter().any(|o| o == "*");

    let allow_origin = if wildcard {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
            .collect();
        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
}
