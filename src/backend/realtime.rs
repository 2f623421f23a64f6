// ABOUTME: Realtime change-event channels for weather rows, backed by tokio broadcast
// ABOUTME: Named channels with a per-second publish throttle and typed change payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Realtime channels.
//!
//! Each named channel owns a broadcast sender. Subscribers receive every
//! payload published after they subscribed; a slow subscriber that falls more
//! than the channel capacity behind observes `RecvError::Lagged`. Publishing is
//! limited to `events_per_second` events per one-second window per channel.

use crate::weather::WeatherSnapshot;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{Duration, Instant};
use tracing::{debug, info};

/// Kind of row change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeEventType {
    /// A new row
    Insert,
    /// An existing row changed
    Update,
    /// A row was removed
    Delete,
}

/// Change event delivered to channel subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeWeatherPayload {
    /// Row after the change (the removed row for deletes)
    pub new: WeatherSnapshot,
    /// Row before the change, if it existed
    pub old: Option<WeatherSnapshot>,
    /// Change kind
    pub event_type: ChangeEventType,
}

impl RealtimeWeatherPayload {
    /// Payload for a freshly observed snapshot, given the previous one
    #[must_use]
    pub fn for_change(new: WeatherSnapshot, old: Option<WeatherSnapshot>) -> Self {
        let event_type = if old.is_some() {
            ChangeEventType::Update
        } else {
            ChangeEventType::Insert
        };
        Self {
            new,
            old,
            event_type,
        }
    }
}

/// Realtime publish failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RealtimeError {
    /// The per-second limit for this channel is spent
    #[error("channel '{channel}' exceeded {limit} events per second")]
    Throttled {
        /// Channel name
        channel: String,
        /// Configured limit
        limit: u32,
    },
}

#[derive(Debug)]
struct ThrottleWindow {
    started: Instant,
    sent: u32,
}

/// One named publish/subscribe channel
#[derive(Debug)]
pub struct RealtimeChannel {
    name: String,
    sender: broadcast::Sender<RealtimeWeatherPayload>,
    events_per_second: u32,
    window: Mutex<ThrottleWindow>,
}

impl RealtimeChannel {
    fn new(name: &str, capacity: usize, events_per_second: u32) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            name: name.to_owned(),
            sender,
            events_per_second,
            window: Mutex::new(ThrottleWindow {
                started: Instant::now(),
                sent: 0,
            }),
        }
    }

    /// Channel name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribe to events published from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeWeatherPayload> {
        self.sender.subscribe()
    }

    /// Current subscriber count
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish an event, returning how many subscribers received it
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Throttled`] when the per-second limit is spent;
    /// the event is dropped in that case
    pub async fn publish(&self, payload: RealtimeWeatherPayload) -> Result<usize, RealtimeError> {
        {
            let mut window = self.window.lock().await;
            let now = Instant::now();
            if now.duration_since(window.started) >= Duration::from_secs(1) {
                window.started = now;
                window.sent = 0;
            }
            if window.sent >= self.events_per_second {
                return Err(RealtimeError::Throttled {
                    channel: self.name.clone(),
                    limit: self.events_per_second,
                });
            }
            window.sent += 1;
        }

        // A send with no receivers is not an error for a fan-out channel
        let delivered = self.sender.send(payload).unwrap_or(0);
        debug!(channel = %self.name, delivered, "Published realtime event");
        Ok(delivered)
    }
}

/// Registry of named channels
#[derive(Debug)]
pub struct RealtimeHub {
    channels: DashMap<String, Arc<RealtimeChannel>>,
    capacity: usize,
    events_per_second: u32,
}

impl RealtimeHub {
    /// Create an empty hub
    #[must_use]
    pub fn new(capacity: usize, events_per_second: u32) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
            events_per_second,
        }
    }

    /// Get or create the channel with this name
    #[must_use]
    pub fn channel(&self, name: &str) -> Arc<RealtimeChannel> {
        self.channels
            .entry(name.to_owned())
            .or_insert_with(|| {
                info!(channel = name, "Opening realtime channel");
                Arc::new(RealtimeChannel::new(
                    name,
                    self.capacity,
                    self.events_per_second,
                ))
            })
            .clone()
    }

    /// Names of the open channels
    #[must_use]
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
