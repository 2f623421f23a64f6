// ABOUTME: Tests for the retry helper and the background poller state machine
// ABOUTME: Uses millisecond cadences so scheduled refetches happen within the test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::Utc;
use futures_util::FutureExt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use weatherdash_server::dashboard::{
    fetch_with_retry, FetchFn, Poller, PollingPolicy, QueryState, QueryStatus,
};
use weatherdash_server::errors::{AppError, ErrorCode};

fn policy(refetch_ms: u64, retry: u32) -> PollingPolicy {
    PollingPolicy {
        stale_time: Duration::from_secs(60),
        refetch_interval: Duration::from_millis(refetch_ms),
        retry,
        retry_delay: Duration::from_millis(1),
    }
}

/// Fetch that counts calls and fails while `failing` is set
fn counting_fetch(calls: &Arc<AtomicU32>, failing: &Arc<AtomicBool>) -> FetchFn<u32> {
    let calls = Arc::clone(calls);
    let failing = Arc::clone(failing);
    Arc::new(move || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        let fail = failing.load(Ordering::SeqCst);
        async move {
            if fail {
                Err(AppError::external_service("test", "offline"))
            } else {
                Ok(n)
            }
        }
        .boxed()
    })
}

async fn wait_for<T: Clone + Send + Sync + 'static>(
    poller: &mut Poller<T>,
    done: impl Fn(&QueryState<T>) -> bool,
) -> QueryState<T> {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let state = poller.state();
            if done(&state) {
                return state;
            }
            poller.changed().await.unwrap();
        }
    })
    .await
    .expect("poller state never matched")
}

#[test]
fn test_default_policies() {
    let card = PollingPolicy::city_card();
    assert_eq!(card.stale_time, Duration::from_secs(300));
    assert_eq!(card.refetch_interval, Duration::from_secs(600));
    assert_eq!(card.retry, 3);

    let insights = PollingPolicy::global_insights();
    assert_eq!(insights.stale_time, Duration::from_secs(600));
    assert_eq!(insights.refetch_interval, Duration::from_secs(900));
    assert_eq!(insights.retry_delay, Duration::from_secs(1));
}

#[test]
fn test_state_staleness() {
    let now = Utc::now();
    let mut state: QueryState<u32> = QueryState::default();
    assert_eq!(state.status, QueryStatus::Loading);
    assert!(state.is_stale(Duration::from_secs(60), now));

    state.updated_at = Some(now - chrono::Duration::seconds(30));
    assert!(!state.is_stale(Duration::from_secs(60), now));
    assert!(state.is_stale(Duration::from_secs(30), now));
}

#[tokio::test]
async fn test_retry_until_success() {
    let attempts = AtomicU32::new(0);
    let result = fetch_with_retry(&policy(1_000, 3), || {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < 2 {
                Err(AppError::external_service("test", "flaky"))
            } else {
                Ok(n)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_gives_up_with_last_error() {
    let attempts = AtomicU32::new(0);
    let result: Result<(), AppError> = fetch_with_retry(&policy(1_000, 2), || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err(AppError::not_found("City 'Atlantis'")) }
    })
    .await;

    assert_eq!(result.unwrap_err().code, ErrorCode::ResourceNotFound);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_poller_loads_then_refetches_on_interval() {
    let calls = Arc::new(AtomicU32::new(0));
    let failing = Arc::new(AtomicBool::new(false));
    let mut poller = Poller::spawn("interval", policy(20, 0), counting_fetch(&calls, &failing));

    let first = wait_for(&mut poller, |s| s.status == QueryStatus::Success).await;
    assert_eq!(first.data, Some(1));
    assert!(first.updated_at.is_some());
    assert!(!poller.is_stale());

    let later = wait_for(&mut poller, |s| s.fetch_count >= 3).await;
    assert!(later.data.unwrap() >= 3);
}

#[tokio::test]
async fn test_manual_refetch() {
    let calls = Arc::new(AtomicU32::new(0));
    let failing = Arc::new(AtomicBool::new(false));
    let mut poller = Poller::spawn("manual", policy(60_000, 0), counting_fetch(&calls, &failing));

    wait_for(&mut poller, |s| s.fetch_count == 1).await;
    poller.refetch();
    let state = wait_for(&mut poller, |s| s.fetch_count == 2).await;
    assert_eq!(state.data, Some(2));
}

#[tokio::test]
async fn test_failed_refetch_keeps_last_data() {
    let calls = Arc::new(AtomicU32::new(0));
    let failing = Arc::new(AtomicBool::new(false));
    let mut poller = Poller::spawn("keeps", policy(60_000, 1), counting_fetch(&calls, &failing));

    wait_for(&mut poller, |s| s.status == QueryStatus::Success).await;
    failing.store(true, Ordering::SeqCst);
    poller.refetch();

    let state = wait_for(&mut poller, |s| s.status == QueryStatus::Error).await;
    assert_eq!(state.data, Some(1));
    assert_eq!(state.error.as_deref(), Some("test: offline"));
    assert_eq!(state.fetch_count, 2);
    // One initial call plus the failed attempt and its retry
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    failing.store(false, Ordering::SeqCst);
    poller.refetch();
    let state = wait_for(&mut poller, |s| s.status == QueryStatus::Success).await;
    assert!(state.error.is_none());
    assert_eq!(state.data, Some(4));
}

#[tokio::test]
async fn test_first_failure_has_no_data() {
    let calls = Arc::new(AtomicU32::new(0));
    let failing = Arc::new(AtomicBool::new(true));
    let mut poller = Poller::spawn("fails", policy(60_000, 0), counting_fetch(&calls, &failing));

    let state = wait_for(&mut poller, |s| s.status == QueryStatus::Error).await;
    assert!(state.data.is_none());
    assert!(state.updated_at.is_none());
    assert!(poller.is_stale());
}
