// ABOUTME: Main library entry point for the weather dashboard backend
// ABOUTME: Wires weather queries, AI summaries, realtime channels, and dashboard views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Weatherdash Server
//!
//! Backend for a live city weather dashboard.
//!
//! ## Features
//!
//! - **Weather queries**: per-city snapshots, batches, global insights, alerts, and usage stats
//!   served from a keyed cache in front of a live or hosted weather source
//! - **Legacy aliases**: the air-quality era names and response shapes, delegating to the
//!   weather queries unchanged
//! - **AI chat and insights**: answers and reports built from live data through an
//!   `OpenAI`-compatible provider, with template fallbacks when no credential is set
//! - **Hosted backend**: table reads and writes plus realtime change channels
//! - **Dashboard**: polling view models with stale times, retries, and manual refetch
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weatherdash_server::config::ServerConfig;
//! use weatherdash_server::context::ServerContext;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let context = Arc::new(ServerContext::from_config(config)?);
//!     weatherdash_server::server::run(context).await
//! }
//! ```

/// AI chat replies and insight reports
pub mod ai;

/// Hosted backend client and realtime channels
pub mod backend;

/// Configuration loaded from the environment
pub mod config;

/// Application constants
pub mod constants;

/// Shared server context handed to every route
pub mod context;

/// Polling dashboard view models
pub mod dashboard;

/// Unified error handling
pub mod errors;

/// Air-quality era aliases over the weather query layer
pub mod legacy;

/// LLM provider abstraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware for request ids and CORS
pub mod middleware;

/// HTTP route handlers
pub mod routes;

/// Router assembly and the serve loop
pub mod server;

/// Weather data, providers, cache, and the query layer
pub mod weather;
