// ABOUTME: Unified error handling re-exported from the core crate
// ABOUTME: Gives server modules a stable `crate::errors` import path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Error types live in `weatherdash_core::errors` so that both crates share one
//! taxonomy. This module re-exports them.

pub use weatherdash_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails,
};
