// ABOUTME: Server context holding configuration, queries, AI services, backend, and dashboard
// ABOUTME: Built from configuration by the binary or assembled from parts in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::ai::{ChatSummarizer, InsightsService};
use crate::backend::HostedBackendClient;
use crate::config::{ServerConfig, WeatherSourceKind};
use crate::dashboard::Dashboard;
use crate::errors::AppResult;
use crate::legacy::air_quality::AirQualityQueries;
use crate::llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::weather::{
    HostedTableProvider, OpenMeteoProvider, QueryCache, QueryCacheConfig, WeatherProvider,
    WeatherQueries, WeatherQueryApi,
};
use std::sync::Arc;
use tracing::info;

/// Everything a request handler may need
#[derive(Clone)]
pub struct ServerContext {
    config: Arc<ServerConfig>,
    queries: Arc<dyn WeatherQueryApi>,
    backend: Option<Arc<HostedBackendClient>>,
    chat: ChatSummarizer,
    insights: Option<InsightsService>,
    dashboard: Option<Arc<Dashboard>>,
}

impl ServerContext {
    /// Context without LLMs, backend, or dashboard
    #[must_use]
    pub fn new(config: ServerConfig, queries: Arc<dyn WeatherQueryApi>) -> Self {
        Self {
            config: Arc::new(config),
            chat: ChatSummarizer::new(Arc::clone(&queries), None),
            queries,
            backend: None,
            insights: None,
            dashboard: None,
        }
    }

    /// Attach the hosted backend client
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<HostedBackendClient>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Model used by the chat handler
    #[must_use]
    pub fn with_chat_llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.chat = ChatSummarizer::new(Arc::clone(&self.queries), Some(llm));
        self
    }

    /// Model used by the insights handler
    #[must_use]
    pub fn with_insights_llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.insights = Some(InsightsService::new(llm));
        self
    }

    /// Mounted dashboard
    #[must_use]
    pub fn with_dashboard(mut self, dashboard: Arc<Dashboard>) -> Self {
        self.dashboard = Some(dashboard);
        self
    }

    /// Construct every collaborator from configuration
    ///
    /// Must run inside a tokio runtime: the query cache and the dashboard
    /// spawn background tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let backend = config
            .backend
            .clone()
            .map(HostedBackendClient::new)
            .transpose()?
            .map(Arc::new);

        let provider: Arc<dyn WeatherProvider> = match (config.weather.source, &backend) {
            (WeatherSourceKind::Hosted, Some(backend)) => {
                Arc::new(HostedTableProvider::new(Arc::clone(backend)))
            }
            _ => Arc::new(OpenMeteoProvider::new(&config.weather)?),
        };
        info!(provider = provider.name(), "Weather provider selected");

        let cache = QueryCache::new(&QueryCacheConfig::default());
        let mut queries = WeatherQueries::new(provider, config.weather.cities.clone(), cache);
        if let Some(backend) = &backend {
            queries = queries.with_backend(Arc::clone(backend));
        }
        let queries: Arc<dyn WeatherQueryApi> = Arc::new(queries);

        let chat_llm = config
            .llm
            .chat_api_key
            .as_deref()
            .map(|key| deepseek(&config, key))
            .transpose()?;
        let insights_llm = config
            .llm
            .insights_api_key
            .as_deref()
            .map(|key| deepseek(&config, key))
            .transpose()?;

        let dashboard = config
            .dashboard
            .enabled
            .then(|| Arc::new(Dashboard::mount(&queries, &config.dashboard.cities)));

        let mut context = Self::new(config, queries);
        if let Some(backend) = backend {
            context = context.with_backend(backend);
        }
        if let Some(llm) = chat_llm {
            context = context.with_chat_llm(llm);
        }
        if let Some(llm) = insights_llm {
            context = context.with_insights_llm(llm);
        }
        if let Some(dashboard) = dashboard {
            context = context.with_dashboard(dashboard);
        }
        Ok(context)
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Weather queries
    #[must_use]
    pub const fn queries(&self) -> &Arc<dyn WeatherQueryApi> {
        &self.queries
    }

    /// Legacy-named view of the same queries
    #[must_use]
    pub fn air_quality(&self) -> AirQualityQueries<dyn WeatherQueryApi> {
        AirQualityQueries::new(Arc::clone(&self.queries))
    }

    /// Hosted backend, when configured
    #[must_use]
    pub fn backend(&self) -> Option<&Arc<HostedBackendClient>> {
        self.backend.as_ref()
    }

    /// Chat summarizer
    #[must_use]
    pub const fn chat(&self) -> &ChatSummarizer {
        &self.chat
    }

    /// Insights service, absent when its credential is not configured
    #[must_use]
    pub const fn insights(&self) -> Option<&InsightsService> {
        self.insights.as_ref()
    }

    /// Dashboard, when mounted
    #[must_use]
    pub fn dashboard(&self) -> Option<&Arc<Dashboard>> {
        self.dashboard.as_ref()
    }
}

fn deepseek(config: &ServerConfig, api_key: &str) -> AppResult<Arc<dyn LlmProvider>> {
    let provider_config = OpenAiCompatibleConfig::deepseek(api_key)
        .with_base_url(config.llm.base_url.clone())
        .with_model(config.llm.model.clone());
    Ok(Arc::new(OpenAiCompatibleProvider::new(provider_config)?))
}
