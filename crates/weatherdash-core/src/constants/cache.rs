// ABOUTME: Cache-related constants for TTL, capacity, and cleanup intervals
// ABOUTME: Sized for the in-memory weather query cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default maximum cache entries for the query cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Single-city snapshot TTL (5 minutes), matches the city card stale time
pub const TTL_CITY_WEATHER_SECS: u64 = 300;

/// City batch TTL (5 minutes)
pub const TTL_MULTIPLE_CITIES_SECS: u64 = 300;

/// Global insights TTL (10 minutes), matches the insights widget stale time
pub const TTL_GLOBAL_INSIGHTS_SECS: u64 = 600;

/// Alert assessment TTL (5 minutes)
pub const TTL_ALERT_SECS: u64 = 300;

/// Root segment of every weather query key
pub const QUERY_KEY_ROOT: &str = "weather";

/// Resolved city coordinates kept by the geocoding lookup
pub const GEOCODING_CACHE_CAPACITY: usize = 512;

/// Last persisted readings kept for change detection
pub const RECENT_READINGS_CAPACITY: usize = 512;
