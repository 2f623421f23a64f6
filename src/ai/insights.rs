// ABOUTME: LLM-generated weather insight reports for city batches and single cities
// ABOUTME: Accepts current or legacy field names and tolerates non-JSON model output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Weather Insights
//!
//! The model is asked for a JSON object. Replies are accepted as bare JSON,
//! fenced JSON, or JSON embedded in prose; anything else is kept verbatim as
//! the `summary`.

use super::prompts::{CITY_INSIGHT_SYSTEM_PROMPT, INSIGHTS_SYSTEM_PROMPT};
use crate::constants::llm::{
    CITY_INSIGHT_MAX_TOKENS, DEEPSEEK_DEFAULT_MODEL, INSIGHTS_MAX_TOKENS, INSIGHTS_TEMPERATURE,
};
use crate::constants::weather::UNKNOWN_POLLUTANT;
use crate::errors::AppResult;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::weather::{assess_alert, AlertSeverity, WeatherSnapshot};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// One city's readings as posted by clients
///
/// Every field is optional on the wire. Legacy payloads name the pollutant
/// either `dominantPollutant` or `dominentPollutant`; both are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CityWeatherRecord {
    /// Display name
    pub city: Option<String>,
    /// `"City, CC"` label
    pub location: Option<String>,
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// mm
    pub precipitation: f64,
    /// km/h
    pub wind_speed: f64,
    /// hPa
    pub pressure: f64,
    /// Condition label
    pub weather_condition: Option<String>,
    /// Observation time as sent
    pub timestamp: Option<String>,
    /// Legacy index, equal to temperature when absent
    pub aqi: Option<f64>,
    /// Legacy pollutant readings
    pub pm25: f64,
    /// Legacy pollutant readings
    pub pm10: f64,
    /// Legacy pollutant readings
    pub o3: f64,
    /// Legacy pollutant readings
    pub no2: f64,
    /// Legacy pollutant readings
    pub so2: f64,
    /// Legacy pollutant readings
    pub co: f64,
    /// Legacy pollutant name
    pub dominant_pollutant: Option<String>,
    /// Misspelled legacy pollutant name
    #[serde(rename = "dominentPollutant")]
    pub dominent_pollutant: Option<String>,
}

impl CityWeatherRecord {
    /// Best available name
    #[must_use]
    pub fn name(&self) -> &str {
        self.city
            .as_deref()
            .or(self.location.as_deref())
            .unwrap_or("Unknown city")
    }

    /// Pollutant under either spelling, `"Unknown"` when neither is set
    #[must_use]
    pub fn pollutant(&self) -> &str {
        self.dominant_pollutant
            .as_deref()
            .or(self.dominent_pollutant.as_deref())
            .unwrap_or(UNKNOWN_POLLUTANT)
    }

    /// Condition label, empty when absent
    #[must_use]
    pub fn condition(&self) -> &str {
        self.weather_condition.as_deref().unwrap_or_default()
    }

    /// Local alert severity for the record's readings
    #[must_use]
    pub fn severity(&self) -> AlertSeverity {
        let snapshot = WeatherSnapshot {
            location: self.name().to_owned(),
            temperature: self.temperature,
            humidity: self.humidity,
            precipitation: self.precipitation,
            wind_speed: self.wind_speed,
            pressure: self.pressure,
            weather_condition: self.condition().to_owned(),
            timestamp: self
                .timestamp
                .as_deref()
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                .map_or_else(Utc::now, |t| t.with_timezone(&Utc)),
            api_source: String::new(),
        };
        assess_alert(&snapshot).severity
    }

    fn prompt_line(&self) -> String {
        format!(
            "- {}: {}°C, {}% humidity, {}mm precipitation, {} km/h wind, {} hPa, condition: {}",
            self.name(),
            self.temperature,
            self.humidity,
            self.precipitation,
            self.wind_speed,
            self.pressure,
            self.condition()
        )
    }
}

impl From<&WeatherSnapshot> for CityWeatherRecord {
    fn from(s: &WeatherSnapshot) -> Self {
        Self {
            city: Some(s.location.clone()),
            location: Some(s.location.clone()),
            temperature: s.temperature,
            humidity: s.humidity,
            precipitation: s.precipitation,
            wind_speed: s.wind_speed,
            pressure: s.pressure,
            weather_condition: Some(s.weather_condition.clone()),
            timestamp: Some(s.timestamp.to_rfc3339()),
            aqi: Some(s.temperature),
            dominant_pollutant: Some(UNKNOWN_POLLUTANT.to_owned()),
            ..Self::default()
        }
    }
}

/// Report over a batch of cities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherInsights {
    /// Overall picture
    pub summary: String,
    /// Observations
    pub key_findings: Vec<String>,
    /// Advice
    pub recommendations: Vec<String>,
    /// Cities with hazardous conditions
    pub risk_cities: Vec<String>,
}

/// Briefing for one city
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CityInsight {
    /// City name
    pub city: String,
    /// Briefing text
    pub summary: String,
    /// Model-assessed risk, or the local severity when the model gave none
    pub risk_level: String,
    /// Advice
    pub recommendations: Vec<String>,
}

/// Find the JSON object in a model reply
fn extract_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

const fn severity_label(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::None => "none",
        AlertSeverity::Advisory => "advisory",
        AlertSeverity::Warning => "warning",
        AlertSeverity::Severe => "severe",
    }
}

/// Generates insight reports via an LLM
#[derive(Clone)]
pub struct InsightsService {
    llm: Arc<dyn LlmProvider>,
}

impl InsightsService {
    /// Create a service backed by `llm`
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Model behind the reports
    #[must_use]
    pub const fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    async fn ask(&self, system: &str, user: String, max_tokens: u32) -> AppResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .with_model(DEEPSEEK_DEFAULT_MODEL)
            .with_temperature(INSIGHTS_TEMPERATURE)
            .with_max_tokens(max_tokens);
        Ok(self.llm.complete(&request).await?.content)
    }

    /// Report over `records`
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails
    #[instrument(skip(self, records), fields(cities = records.len()))]
    pub async fn generate_insights(&self, records: &[CityWeatherRecord]) -> AppResult<WeatherInsights> {
        let lines: Vec<String> = records.iter().map(CityWeatherRecord::prompt_line).collect();
        let user = format!(
            "Current readings for {} cities:\n{}",
            records.len(),
            lines.join("\n")
        );
        let reply = self.ask(INSIGHTS_SYSTEM_PROMPT, user, INSIGHTS_MAX_TOKENS).await?;

        Ok(extract_json(&reply).unwrap_or_else(|| {
            debug!("Insight reply was not JSON, keeping it as the summary");
            WeatherInsights {
                summary: reply.trim().to_owned(),
                ..WeatherInsights::default()
            }
        }))
    }

    /// Briefing for one city, `None` when the model returned nothing
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails
    #[instrument(skip(self, record), fields(city = record.name()))]
    pub async fn generate_city_insight(
        &self,
        record: &CityWeatherRecord,
    ) -> AppResult<Option<CityInsight>> {
        let user = format!("Current readings:\n{}", record.prompt_line());
        let reply = self
            .ask(CITY_INSIGHT_SYSTEM_PROMPT, user, CITY_INSIGHT_MAX_TOKENS)
            .await?;
        if reply.trim().is_empty() {
            return Ok(None);
        }

        let mut insight = extract_json::<CityInsight>(&reply).unwrap_or_else(|| CityInsight {
            summary: reply.trim().to_owned(),
            ..CityInsight::default()
        });
        if insight.city.is_empty() {
            record.name().clone_into(&mut insight.city);
        }
        if insight.risk_level.is_empty() {
            severity_label(record.severity()).clone_into(&mut insight.risk_level);
        }
        Ok(Some(insight))
    }
}
