// ABOUTME: Server-side monitoring dashboard built from independent per-card pollers
// ABOUTME: Produces serializable view models in loading, error, or ready states
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Monitoring Dashboard
//!
//! [`Dashboard::mount`] starts one poller per city card and one for the
//! global insights widget. Each runs on its own schedule; dropping the
//! dashboard stops them all.

/// Display derivations and view models
pub mod display;
/// Polling policies and pollers
pub mod polling;

pub use display::{
    condition_badge, feels_like, temperature_band, BadgeColor, GlobalInsightsView,
    TemperatureBand, WeatherCardView,
};
pub use polling::{fetch_with_retry, FetchFn, Poller, PollingPolicy, QueryState, QueryStatus};

use crate::weather::{GlobalInsights, WeatherQueryApi, WeatherSnapshot};
use futures_util::FutureExt;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Message on a card whose fetch failed
const CARD_FAILED: &str = "Failed to load weather data";
/// Message on the insights widget when its fetch failed
const INSIGHTS_FAILED: &str = "Failed to load global weather insights";

/// One rendered panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "lowercase")]
pub enum Panel<T> {
    /// First fetch still running
    Loading,
    /// Last fetch failed; the client may retry
    Error {
        /// Display message
        message: String,
        /// Underlying failure
        detail: Option<String>,
    },
    /// Data available
    Ready(T),
}

impl<T> Panel<T> {
    fn from_state<S>(state: &QueryState<S>, failed: &str, render: impl Fn(&S) -> T) -> Self {
        match (state.status, state.data.as_ref()) {
            (QueryStatus::Error, _) => Self::Error {
                message: failed.to_owned(),
                detail: state.error.clone(),
            },
            (_, Some(data)) => Self::Ready(render(data)),
            (_, None) => Self::Loading,
        }
    }
}

/// A weather card panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPanel {
    /// City the card was mounted for
    pub city: String,
    /// Whether the card's data is past its stale time
    pub stale: bool,
    /// Completed fetch cycles
    pub fetch_count: u64,
    /// Card content
    #[serde(flatten)]
    pub panel: Panel<WeatherCardView>,
}

/// Full dashboard view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Global insights widget
    pub global_insights: Panel<GlobalInsightsView>,
    /// City cards in mount order
    pub cards: Vec<CardPanel>,
}

/// Mounted dashboard
pub struct Dashboard {
    insights: Poller<GlobalInsights>,
    cards: Vec<(String, Poller<WeatherSnapshot>)>,
}

impl Dashboard {
    /// Mount the insights widget and one card per city
    #[must_use]
    pub fn mount(queries: &Arc<dyn WeatherQueryApi>, cities: &[String]) -> Self {
        Self::mount_with(
            queries,
            cities,
            PollingPolicy::city_card(),
            PollingPolicy::global_insights(),
        )
    }

    /// Mount with explicit policies
    #[must_use]
    pub fn mount_with(
        queries: &Arc<dyn WeatherQueryApi>,
        cities: &[String],
        card_policy: PollingPolicy,
        insights_policy: PollingPolicy,
    ) -> Self {
        let insights_queries = Arc::clone(queries);
        let insights_fetch: FetchFn<GlobalInsights> = Arc::new(move || {
            let q = Arc::clone(&insights_queries);
            async move { q.global_weather_insights().await }.boxed()
        });
        let insights = Poller::spawn("global-insights", insights_policy, insights_fetch);

        let cards = cities
            .iter()
            .map(|city| {
                let card_queries = Arc::clone(queries);
                let card_city = city.clone();
                let fetch: FetchFn<WeatherSnapshot> = Arc::new(move || {
                    let q = Arc::clone(&card_queries);
                    let c = card_city.clone();
                    async move { q.weather_by_city(&c).await }.boxed()
                });
                (
                    city.clone(),
                    Poller::spawn(format!("card:{city}"), card_policy, fetch),
                )
            })
            .collect();

        info!(cards = cities.len(), "Dashboard mounted");
        Self { insights, cards }
    }

    /// Cities with a mounted card
    #[must_use]
    pub fn cities(&self) -> Vec<&str> {
        self.cards.iter().map(|(city, _)| city.as_str()).collect()
    }

    /// Trigger an immediate refetch of one card, false if no such card
    pub fn refetch_city(&self, city: &str) -> bool {
        let card = self
            .cards
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city.trim()));
        if let Some((_, poller)) = card {
            poller.refetch();
        }
        card.is_some()
    }

    /// Trigger an immediate refetch of every panel
    pub fn refetch_all(&self) {
        self.insights.refetch();
        for (_, poller) in &self.cards {
            poller.refetch();
        }
    }

    /// Render the current state of every panel
    #[must_use]
    pub fn view(&self) -> DashboardView {
        let insights_state = self.insights.state();
        let global_insights =
            Panel::from_state(&insights_state, INSIGHTS_FAILED, |i| GlobalInsightsView::from(i));

        let cards = self
            .cards
            .iter()
            .map(|(city, poller)| {
                let state = poller.state();
                CardPanel {
                    city: city.clone(),
                    stale: poller.is_stale(),
                    fetch_count: state.fetch_count,
                    panel: Panel::from_state(&state, CARD_FAILED, |s| WeatherCardView::from(s)),
                }
            })
            .collect();

        DashboardView {
            global_insights,
            cards,
        }
    }
}
