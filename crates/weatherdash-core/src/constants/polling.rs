// ABOUTME: Dashboard polling cadence constants for city cards and the insights widget
// ABOUTME: Stale times, refetch intervals, and retry policy shared by all pollers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// City card data becomes stale after 5 minutes
pub const CITY_CARD_STALE_SECS: u64 = 300;

/// City cards refetch every 10 minutes
pub const CITY_CARD_REFETCH_SECS: u64 = 600;

/// Global insights become stale after 10 minutes
pub const GLOBAL_INSIGHTS_STALE_SECS: u64 = 600;

/// Global insights refetch every 15 minutes
pub const GLOBAL_INSIGHTS_REFETCH_SECS: u64 = 900;

/// Retries after the first failed attempt
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Fixed delay between retries in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
