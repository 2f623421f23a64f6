// ABOUTME: Polling policies, retry helper, and per-card pollers with observable query state
// ABOUTME: Each poller owns one tokio task that refetches on its interval or on demand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Polling
//!
//! A [`Poller`] runs its fetch immediately, then again every
//! `refetch_interval` or whenever [`Poller::refetch`] is called. Failed
//! fetches are retried `retry` times with a fixed `retry_delay` before the
//! state turns to error. A failed refetch keeps the last good data.
//!
//! Pollers share nothing; dropping one aborts its task.

use crate::constants::polling::{
    CITY_CARD_REFETCH_SECS, CITY_CARD_STALE_SECS, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY_MS,
    GLOBAL_INSIGHTS_REFETCH_SECS, GLOBAL_INSIGHTS_STALE_SECS,
};
use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Cadence and retry settings for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    /// Age after which data counts as stale
    pub stale_time: Duration,
    /// Interval between scheduled refetches
    pub refetch_interval: Duration,
    /// Extra attempts after a failure
    pub retry: u32,
    /// Fixed pause between attempts
    pub retry_delay: Duration,
}

impl PollingPolicy {
    /// Weather card cadence
    #[must_use]
    pub const fn city_card() -> Self {
        Self {
            stale_time: Duration::from_secs(CITY_CARD_STALE_SECS),
            refetch_interval: Duration::from_secs(CITY_CARD_REFETCH_SECS),
            retry: DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }

    /// Global insights widget cadence
    #[must_use]
    pub const fn global_insights() -> Self {
        Self {
            stale_time: Duration::from_secs(GLOBAL_INSIGHTS_STALE_SECS),
            refetch_interval: Duration::from_secs(GLOBAL_INSIGHTS_REFETCH_SECS),
            retry: DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Run `fetch`, retrying up to `policy.retry` times with a fixed delay
///
/// # Errors
///
/// Returns the last error once every attempt has failed
pub async fn fetch_with_retry<T, F, Fut>(policy: &PollingPolicy, mut fetch: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.retry => {
                attempt += 1;
                warn!(attempt, retries = policy.retry, error = %e, "Fetch failed, retrying");
                tokio::time::sleep(policy.retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Lifecycle of a polled query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// No fetch has completed yet
    Loading,
    /// Last fetch succeeded
    Success,
    /// Last fetch failed after all retries
    Error,
}

/// Observable state of one poller
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    /// Current status
    pub status: QueryStatus,
    /// Last good data
    pub data: Option<T>,
    /// Message of the last failure
    pub error: Option<String>,
    /// When `data` was fetched
    pub updated_at: Option<DateTime<Utc>>,
    /// Completed fetch cycles, successful or not
    pub fetch_count: u64,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Loading,
            data: None,
            error: None,
            updated_at: None,
            fetch_count: 0,
        }
    }
}

impl<T> QueryState<T> {
    /// True when there is no data or it is older than `stale_time`
    #[must_use]
    pub fn is_stale(&self, stale_time: Duration, now: DateTime<Utc>) -> bool {
        let Some(updated) = self.updated_at else {
            return true;
        };
        chrono::Duration::from_std(stale_time).is_ok_and(|stale| now - updated >= stale)
    }
}

/// Boxed fetch closure driven by a poller
pub type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, AppResult<T>> + Send + Sync>;

/// Background poller for one query
pub struct Poller<T> {
    policy: PollingPolicy,
    state: watch::Receiver<QueryState<T>>,
    refetch: Arc<Notify>,
    task: JoinHandle<()>,
}

impl<T> Poller<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start polling; the first fetch runs immediately
    #[must_use]
    pub fn spawn(name: impl Into<String>, policy: PollingPolicy, fetch: FetchFn<T>) -> Self {
        let name = name.into();
        let (tx, rx) = watch::channel(QueryState::default());
        let refetch = Arc::new(Notify::new());
        let trigger = Arc::clone(&refetch);

        let task = tokio::spawn(async move {
            loop {
                let result = fetch_with_retry(&policy, || fetch()).await;
                tx.send_modify(|state| {
                    state.fetch_count += 1;
                    match result {
                        Ok(data) => {
                            state.status = QueryStatus::Success;
                            state.data = Some(data);
                            state.error = None;
                            state.updated_at = Some(Utc::now());
                        }
                        Err(e) => {
                            warn!(poller = %name, error = %e, "Poll failed");
                            state.status = QueryStatus::Error;
                            state.error = Some(e.message);
                        }
                    }
                });

                tokio::select! {
                    () = tokio::time::sleep(policy.refetch_interval) => {
                        debug!(poller = %name, "Scheduled refetch");
                    }
                    () = trigger.notified() => {
                        debug!(poller = %name, "Manual refetch");
                    }
                }
            }
        });

        Self {
            policy,
            state: rx,
            refetch,
            task,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// Policy the poller runs with
    #[must_use]
    pub const fn policy(&self) -> &PollingPolicy {
        &self.policy
    }

    /// Whether the current data is stale under the poller's policy
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.state.borrow().is_stale(self.policy.stale_time, Utc::now())
    }

    /// Request an immediate refetch
    pub fn refetch(&self) {
        self.refetch.notify_one();
    }

    /// Wait until the state has changed since it was last read
    ///
    /// # Errors
    ///
    /// Returns an error if the polling task has stopped
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.state.changed().await
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
