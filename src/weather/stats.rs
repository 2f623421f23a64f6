// ABOUTME: Lock-free usage counters for the weather query layer
// ABOUTME: Tracks requests, cache hits and misses, upstream errors, and last request time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::models::WeatherApiStats;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Sentinel for "no request yet"
const NEVER: i64 = i64::MIN;

/// Query counters
#[derive(Debug)]
pub struct QueryStats {
    total_requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    upstream_errors: AtomicU64,
    last_request_ms: AtomicI64,
}

impl Default for QueryStats {
    fn default() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            upstream_errors: AtomicU64::new(0),
            last_request_ms: AtomicI64::new(NEVER),
        }
    }
}

impl QueryStats {
    /// Count a query call
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.last_request_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Count a cache hit
    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a cache miss
    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed provider call
    pub fn record_upstream_error(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    #[must_use]
    pub fn snapshot(&self, api_source: &str) -> WeatherApiStats {
        let last = self.last_request_ms.load(Ordering::Relaxed);
        WeatherApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            api_source: api_source.to_owned(),
            last_request_at: (last != NEVER)
                .then(|| DateTime::from_timestamp_millis(last))
                .flatten(),
        }
    }
}
