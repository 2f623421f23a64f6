// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed server, weather, backend, and LLM settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use crate::constants::{backend, env_vars, llm, network, weather};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Environment type for logging and other deployment-specific behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Where weather snapshots come from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherSourceKind {
    /// Live Open-Meteo forecast API
    #[default]
    OpenMeteo,
    /// Rows already cached in the hosted backend table
    Hosted,
}

impl FromStr for WeatherSourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open-meteo" | "openmeteo" => Ok(Self::OpenMeteo),
            "hosted" | "supabase" => Ok(Self::Hosted),
            other => Err(AppError::config_invalid("WEATHER_SOURCE", other)),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allowed CORS origins, `*` for any
    pub cors_allowed_origins: Vec<String>,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Selected provider
    pub source: WeatherSourceKind,
    /// Open-Meteo forecast base URL
    pub forecast_url: String,
    /// Open-Meteo geocoding base URL
    pub geocoding_url: String,
    /// Outbound request timeout
    pub request_timeout_secs: u64,
    /// Monitored city catalog, in batch order
    pub cities: Vec<String>,
}

/// Hosted database and realtime service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedBackendConfig {
    /// Project URL
    pub url: String,
    /// Public anon key sent as `apikey` and bearer token
    pub anon_key: String,
    /// Weather table name
    pub weather_table: String,
    /// Realtime publish throttle
    pub events_per_second: u32,
}

/// LLM credentials and endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Credential for the chat handler (`DEEPSEEK_API_KEY`)
    pub chat_api_key: Option<String>,
    /// Credential for the insights handler (`Deepseek_API_KEY`)
    pub insights_api_key: Option<String>,
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Model id
    pub model: String,
}

/// Dashboard poller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Start pollers at boot
    pub enabled: bool,
    /// Cities with a mounted card
    pub cities: Vec<String>,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP listener
    pub http: HttpConfig,
    /// Weather provider
    pub weather: WeatherConfig,
    /// Hosted backend, present only when URL and key are both set
    pub backend: Option<HostedBackendConfig>,
    /// LLM endpoint and credentials
    pub llm: LlmConfig,
    /// Dashboard pollers
    pub dashboard: DashboardConfig,
}

impl ServerConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid, or if the
    /// hosted weather source is selected without a hosted backend
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ServerConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = get("ENVIRONMENT")
            .map_or_else(Environment::default, |v| Environment::from_str_or_default(&v));

        let http = HttpConfig {
            host: get("HTTP_HOST").unwrap_or_else(|| network::DEFAULT_HTTP_HOST.to_owned()),
            port: parse_or("HTTP_PORT", get("HTTP_PORT"), network::DEFAULT_HTTP_PORT)?,
            cors_allowed_origins: parse_origins(
                get("CORS_ALLOWED_ORIGINS").as_deref().unwrap_or("*"),
            ),
        };

        let source = get("WEATHER_SOURCE")
            .map(|v| v.parse::<WeatherSourceKind>())
            .transpose()?
            .unwrap_or_default();

        let weather_config = WeatherConfig {
            source,
            forecast_url: get("OPEN_METEO_FORECAST_URL")
                .unwrap_or_else(|| weather::OPEN_METEO_FORECAST_URL.to_owned()),
            geocoding_url: get("OPEN_METEO_GEOCODING_URL")
                .unwrap_or_else(|| weather::OPEN_METEO_GEOCODING_URL.to_owned()),
            request_timeout_secs: parse_or(
                "WEATHER_REQUEST_TIMEOUT_SECS",
                get("WEATHER_REQUEST_TIMEOUT_SECS"),
                weather::WEATHER_REQUEST_TIMEOUT_SECS,
            )?,
            cities: get("WEATHER_CITIES").map_or_else(
                || to_owned_list(&weather::DEFAULT_MONITORED_CITIES),
                |v| parse_list(&v, ';'),
            ),
        };

        let backend = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(HostedBackendConfig {
                url: url.trim_end_matches('/').to_owned(),
                anon_key,
                weather_table: get("SUPABASE_WEATHER_TABLE")
                    .unwrap_or_else(|| backend::DEFAULT_WEATHER_TABLE.to_owned()),
                events_per_second: parse_or(
                    "SUPABASE_EVENTS_PER_SECOND",
                    get("SUPABASE_EVENTS_PER_SECOND"),
                    backend::DEFAULT_EVENTS_PER_SECOND,
                )?,
            }),
            _ => None,
        };

        if source == WeatherSourceKind::Hosted && backend.is_none() {
            return Err(AppError::config_missing("SUPABASE_URL and SUPABASE_ANON_KEY"));
        }

        let llm_config = LlmConfig {
            chat_api_key: get(env_vars::CHAT_API_KEY),
            insights_api_key: get(env_vars::INSIGHTS_API_KEY),
            base_url: get("DEEPSEEK_BASE_URL")
                .unwrap_or_else(|| llm::DEEPSEEK_DEFAULT_BASE_URL.to_owned()),
            model: get("DEEPSEEK_MODEL").unwrap_or_else(|| llm::DEEPSEEK_DEFAULT_MODEL.to_owned()),
        };

        let dashboard = DashboardConfig {
            enabled: parse_or("DASHBOARD_ENABLED", get("DASHBOARD_ENABLED"), true)?,
            cities: get("DASHBOARD_CITIES").map_or_else(
                || to_owned_list(&weather::DEFAULT_DASHBOARD_CITIES),
                |v| parse_list(&v, ';'),
            ),
        };

        Ok(Self {
            environment,
            http,
            weather: weather_config,
            backend,
            llm: llm_config,
            dashboard,
        })
    }

    /// Socket address string for the HTTP listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }

    /// Log-safe configuration summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Weatherdash Server Configuration:\n\
             - Environment: {}\n\
             - HTTP: {}\n\
             - Weather Source: {:?} ({} cities)\n\
             - Hosted Backend: {}\n\
             - Chat LLM Key: {}\n\
             - Insights LLM Key: {}\n\
             - LLM Model: {}\n\
             - Dashboard: {}",
            self.environment,
            self.bind_address(),
            self.weather.source,
            self.weather.cities.len(),
            self.backend.as_ref().map_or("Disabled", |_| "Enabled"),
            presence(self.llm.chat_api_key.as_ref()),
            presence(self.llm.insights_api_key.as_ref()),
            self.llm.model,
            if self.dashboard.enabled {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

fn presence(value: Option<&String>) -> &'static str {
    if value.is_some() {
        "Present"
    } else {
        "Missing"
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> AppResult<T> {
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| AppError::config_invalid(key, &raw))
    })
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

/// Parse a city list
///
/// City names carry a `", CC"` country hint, so the separator is `;`.
/// A value without `;` falls back to comma separation.
fn parse_list(raw: &str, separator: char) -> Vec<String> {
    let separator = if raw.contains(separator) { separator } else { ',' };
    raw.split(separator)
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://a.test, http://b.test ,"),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_parse_list_prefers_semicolons() {
        assert_eq!(
            parse_list("London, GB; Paris, FR", ';'),
            vec!["London, GB", "Paris, FR"]
        );
        assert_eq!(parse_list("London,Paris", ';'), vec!["London", "Paris"]);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("anything"),
            Environment::Development
        );
    }
}
