// ABOUTME: HTTP middleware for CORS, request IDs, and per-request tracing spans
// ABOUTME: Layers are assembled by the server when the router is built
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS layer built from configuration
pub mod cors;
/// Request ID generation and request spans
pub mod request_id;

// CORS configuration
pub use cors::setup_cors;

// Request IDs and spans
pub use request_id::{make_request_span, MakeRequestUuid, REQUEST_ID_HEADER};
