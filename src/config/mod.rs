// ABOUTME: Configuration management module for centralized server settings and parameters
// ABOUTME: Environment-only configuration; no config files are read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the weatherdash server

/// Environment and server configuration
pub mod environment;

pub use environment::{
    DashboardConfig, Environment, HostedBackendConfig, HttpConfig, LlmConfig, ServerConfig,
    WeatherConfig, WeatherSourceKind,
};
