// ABOUTME: Chat summarization over live weather data with an LLM or a templated fallback
// ABOUTME: Builds the context prompt and the two deterministic fallback responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Weather Chat
//!
//! [`ChatSummarizer::respond`] fetches the summary batch and the global
//! insights concurrently. Both must succeed. With an LLM configured the
//! context prompt is sent as a single user message; without one the reply is
//! one of the two templates in [`fallback_response`].

use crate::constants::llm::{CHAT_MAX_TOKENS, CHAT_TEMPERATURE, DEEPSEEK_DEFAULT_MODEL};
use crate::constants::weather::SUMMARY_BATCH_SIZE;
use crate::errors::AppResult;
use crate::legacy::air_quality::{legacy_view, LegacySnapshot};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::weather::{
    assess_alert, short_name, CityExtreme, GlobalInsights, WeatherQueryApi, WeatherSnapshot,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Words that select the detailed fallback template
const DETAIL_KEYWORDS: [&str; 5] = ["temperature", "humidity", "precipitation", "wind", "detailed"];

const NOT_AVAILABLE: &str = "N/A";

/// Generated chat reply
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Reply text
    pub response: String,
    /// Cities in the context batch
    pub cities_included: usize,
    /// When the reply was produced
    pub last_update: DateTime<Utc>,
}

/// True when the message asks for per-city measurements
#[must_use]
pub fn is_weather_detail_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    DETAIL_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Prompt that grounds the model in the current data
#[must_use]
pub fn build_context_prompt(
    cities: &[WeatherSnapshot],
    insights: &GlobalInsights,
    message: &str,
    now: DateTime<Utc>,
) -> String {
    let mut prompt = format!(
        "You are an AI weather assistant with access to real-time weather data. \n\n\
         CURRENT WEATHER DATA (Updated: {}):\n",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    );

    let lines: Vec<String> = cities
        .iter()
        .map(|c| {
            format!(
                "• {}: {}°C, {}% humidity, {}mm precipitation, {} km/h wind, {} hPa pressure - Condition: {}",
                c.location,
                c.temperature,
                c.humidity,
                c.precipitation,
                c.wind_speed,
                c.pressure,
                c.weather_condition
            )
        })
        .collect();
    prompt.push_str(&lines.join("\n"));

    let extreme = |city: Option<&CityExtreme>| {
        city.map_or_else(
            || (NOT_AVAILABLE.to_owned(), NOT_AVAILABLE.to_owned()),
            |c| (c.name.clone(), c.temperature.to_string()),
        )
    };
    let (coolest_name, coolest_temp) = extreme(insights.coolest_city.as_ref());
    let (warmest_name, warmest_temp) = extreme(insights.warmest_city.as_ref());

    let _ = write!(
        prompt,
        "\n\nGLOBAL INSIGHTS:\n\
         • Cities monitored: {}\n\
         • Average Temperature: {}°C\n\
         • Cities with alerts: {}\n\
         • Coolest weather: {coolest_name} ({coolest_temp}°C)\n\
         • Warmest weather: {warmest_name} ({warmest_temp}°C)\n\n\
         Use this real-time data to provide accurate, current information about weather conditions. \
         When users ask about specific cities, reference the actual current weather data above.\n\n\
         User message: {message}",
        insights.total_cities_monitored, insights.average_temperature, insights.cities_with_alerts,
    );
    prompt
}

/// Templated reply used when no LLM credential is configured
#[must_use]
pub fn fallback_response(message: &str, cities: &[WeatherSnapshot], now: DateTime<Utc>) -> String {
    if is_weather_detail_request(message) {
        detailed_fallback(cities, now)
    } else {
        summary_fallback(cities)
    }
}

fn detailed_fallback(cities: &[WeatherSnapshot], now: DateTime<Utc>) -> String {
    let blocks: Vec<String> = cities
        .iter()
        .map(|c| {
            format!(
                "**{name}**: {t}°C, {cond}\n  • Temperature: {t}°C\n  • Humidity: {h}%\n  \
                 • Precipitation: {p}mm\n  • Wind Speed: {w} km/h\n  • Pressure: {pr} hPa\n  \
                 • Condition: {cond}\n",
                name = c.city_name(),
                t = c.temperature,
                cond = condition_or_na(c),
                h = c.humidity,
                p = c.precipitation,
                w = c.wind_speed,
                pr = c.pressure,
            )
        })
        .collect();

    format!(
        "🌍 **Detailed Weather Data** ({} cities):\n\n{}\n*Live weather data updated {}*",
        cities.len(),
        blocks.join("\n"),
        now.format("%H:%M:%S")
    )
}

fn summary_fallback(cities: &[WeatherSnapshot]) -> String {
    let views: Vec<LegacySnapshot> = cities.iter().map(legacy_view).collect();
    let (alerts, good): (Vec<&LegacySnapshot>, Vec<&LegacySnapshot>) = views
        .iter()
        .partition(|v| assess_alert(&v.weather).severity.is_alert());

    let mut ranked: Vec<&LegacySnapshot> = views.iter().collect();
    ranked.sort_by(|a, b| a.aqi.total_cmp(&b.aqi));

    let current: Vec<String> = views
        .iter()
        .map(|v| format!("{} ({}°C, {})", short(v), v.weather.temperature, v.health_level))
        .collect();

    let mut text = format!(
        "Based on current weather data from {} cities:\n\n🌍 **Current Cities**: {}\n\n",
        cities.len(),
        current.join(", ")
    );

    if !alerts.is_empty() {
        let list: Vec<String> = alerts
            .iter()
            .map(|v| format!("{} ({}°C)", short(v), v.weather.temperature))
            .collect();
        let _ = write!(text, "⚠️ **Cities with Weather Alerts**: {}\n\n", list.join(", "));
    }
    if !good.is_empty() {
        let list: Vec<String> = good
            .iter()
            .map(|v| format!("{} ({}°C, {})", short(v), v.weather.temperature, v.health_level))
            .collect();
        let _ = write!(text, "✅ **Good Weather Conditions**: {}\n\n", list.join(", "));
    }

    let ranked_entry = |v: Option<&&LegacySnapshot>| {
        v.map_or_else(
            || (NOT_AVAILABLE.to_owned(), NOT_AVAILABLE.to_owned()),
            |v| (short(v).to_owned(), v.aqi.to_string()),
        )
    };
    let (best_name, best_aqi) = ranked_entry(ranked.first());
    let (worst_name, worst_aqi) = ranked_entry(ranked.last());
    let _ = write!(
        text,
        "🏆 **Best**: {best_name} (AQI {best_aqi})\n📉 **Worst**: {worst_name} (AQI {worst_aqi})\n\n\
         *Note: DeepSeek AI is not configured. Showing current live data.*"
    );
    text
}

fn short(view: &LegacySnapshot) -> &str {
    short_name(&view.weather.location)
}

fn condition_or_na(snapshot: &WeatherSnapshot) -> &str {
    if snapshot.weather_condition.is_empty() {
        NOT_AVAILABLE
    } else {
        &snapshot.weather_condition
    }
}

/// Answers chat messages from current weather data
#[derive(Clone)]
pub struct ChatSummarizer {
    queries: Arc<dyn WeatherQueryApi>,
    llm: Option<Arc<dyn LlmProvider>>,
}

impl ChatSummarizer {
    /// Create a summarizer; `llm` is `None` when no credential is configured
    #[must_use]
    pub fn new(queries: Arc<dyn WeatherQueryApi>, llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { queries, llm }
    }

    /// Whether replies come from the model
    #[must_use]
    pub const fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Model used for replies, if configured
    #[must_use]
    pub const fn llm(&self) -> Option<&Arc<dyn LlmProvider>> {
        self.llm.as_ref()
    }

    /// Answer `message` against the current summary batch
    ///
    /// # Errors
    ///
    /// Returns an error if either weather fetch fails or the model call fails
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn respond(&self, message: &str) -> AppResult<ChatReply> {
        let (cities, insights) = tokio::try_join!(
            self.queries.multiple_cities_weather(SUMMARY_BATCH_SIZE),
            self.queries.global_weather_insights(),
        )?;
        let now = Utc::now();

        let response = if let Some(llm) = &self.llm {
            info!(provider = llm.name(), "Generating chat reply with LLM");
            let prompt = build_context_prompt(&cities, &insights, message, now);
            let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
                .with_model(DEEPSEEK_DEFAULT_MODEL)
                .with_temperature(CHAT_TEMPERATURE)
                .with_max_tokens(CHAT_MAX_TOKENS);
            llm.complete(&request).await?.content
        } else {
            warn!("LLM credential not configured, using fallback response");
            fallback_response(message, &cities, now)
        };

        Ok(ChatReply {
            response,
            cities_included: cities.len(),
            last_update: now,
        })
    }
}
