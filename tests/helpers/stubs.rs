// ABOUTME: In-process stand-ins for the weather provider and the LLM provider
// ABOUTME: Count calls and record requests so tests can assert on collaborator traffic

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use weatherdash_server::config::ServerConfig;
use weatherdash_server::errors::{AppError, AppResult};
use weatherdash_server::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use weatherdash_server::weather::{
    short_name, QueryCache, QueryCacheConfig, WeatherProvider, WeatherQueries, WeatherSnapshot,
};

/// Snapshot with calm defaults for the fields a test does not care about
pub fn snapshot(location: &str, temperature: f64, condition: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        location: location.to_owned(),
        temperature,
        humidity: 55.0,
        precipitation: 0.0,
        wind_speed: 10.0,
        pressure: 1013.0,
        weather_condition: condition.to_owned(),
        timestamp: Utc::now(),
        api_source: "stub".to_owned(),
    }
}

/// Configuration with every variable unset
pub fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|_| None).expect("default configuration")
}

/// Cache without the background sweep
pub fn test_cache() -> QueryCache {
    QueryCache::new(&QueryCacheConfig {
        enable_background_cleanup: false,
        ..QueryCacheConfig::default()
    })
}

/// Query layer over `provider` for the given catalog
pub fn queries_over(provider: Arc<StubProvider>, cities: &[&str]) -> WeatherQueries {
    WeatherQueries::new(
        provider,
        cities.iter().map(|c| (*c).to_owned()).collect(),
        test_cache(),
    )
}

fn key(city: &str) -> String {
    short_name(city).to_lowercase()
}

/// Weather provider serving fixed snapshots
pub struct StubProvider {
    snapshots: Mutex<HashMap<String, WeatherSnapshot>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    live: bool,
}

impl StubProvider {
    /// Live provider serving `snapshots`
    pub fn new(snapshots: impl IntoIterator<Item = WeatherSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(
                snapshots
                    .into_iter()
                    .map(|s| (key(&s.location), s))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            live: true,
        }
    }

    /// Provider that reports itself as a hosted table reader
    pub fn hosted(snapshots: impl IntoIterator<Item = WeatherSnapshot>) -> Self {
        Self {
            live: false,
            ..Self::new(snapshots)
        }
    }

    /// Provider calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every call fail, or stop failing
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Replace the snapshot served for its location
    pub fn update(&self, snapshot: WeatherSnapshot) {
        self.snapshots
            .lock()
            .unwrap()
            .insert(key(&snapshot.location), snapshot);
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn is_live(&self) -> bool {
        self.live
    }

    async fn current(&self, city: &str) -> AppResult<WeatherSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("stub", "upstream down"));
        }
        self.snapshots
            .lock()
            .unwrap()
            .get(&key(city))
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("City '{city}'")))
    }
}

/// LLM provider returning a canned reply
pub struct StubLlm {
    reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubLlm {
    /// Reply with `content` to every request
    pub fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(content.to_owned()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Fail every request
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn name(&self) -> &str {
        "stub"
    }

    fn display_name(&self) -> &str {
        "Stub"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::text_only()
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.as_ref().map_or_else(
            || Err(AppError::external_service("Stub", "model unavailable")),
            |content| {
                Ok(ChatResponse {
                    content: content.clone(),
                    model: "stub-model".to_owned(),
                    usage: None,
                    finish_reason: Some("stop".to_owned()),
                })
            },
        )
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(self.reply.is_some())
    }
}
