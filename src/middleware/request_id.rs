// ABOUTME: Request ID generation and the per-request tracing span
// ABOUTME: Reuses an incoming x-request-id header or mints a UUID v4
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request ID in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Mints `req_<uuid>` IDs for requests that arrive without one
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = format!("req_{}", Uuid::new_v4().simple());
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Span for one HTTP request, tagged with its request ID
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        status_code = tracing::field::Empty,
    )
}
