// ABOUTME: Hosted backend constants (table, channel names, realtime throttle)
// ABOUTME: Defaults for the managed database and realtime channel client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Table holding cached weather rows
pub const DEFAULT_WEATHER_TABLE: &str = "cached_weather_data";

/// Channel used for weather change events
pub const DEFAULT_WEATHER_CHANNEL: &str = "weather-updates";

/// Realtime publish throttle
pub const DEFAULT_EVENTS_PER_SECOND: u32 = 10;

/// Buffered events per channel before slow subscribers lag
pub const CHANNEL_CAPACITY: usize = 256;

/// Hosted backend request timeout in seconds
pub const BACKEND_REQUEST_TIMEOUT_SECS: u64 = 10;
