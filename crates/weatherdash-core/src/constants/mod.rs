// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for caching, polling, LLM calls, and weather alerts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain.

/// Query cache sizing and TTLs
pub mod cache;
/// Dashboard polling cadences
pub mod polling;
/// LLM provider defaults
pub mod llm;
/// Weather alert thresholds and city catalogs
pub mod weather;
/// Hosted backend defaults
pub mod backend;
