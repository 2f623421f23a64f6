// ABOUTME: Core types and constants for the weatherdash backend
// ABOUTME: Foundation crate with error handling and domain constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Weatherdash Core
//!
//! Foundation crate shared by the weatherdash server. It changes rarely, which
//! keeps incremental builds of the server crate fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Polling cadences, cache sizing, LLM and alert constants

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
