// ABOUTME: Server binary for the weather dashboard backend
// ABOUTME: Loads environment configuration, installs logging, and serves HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]

//! # Weatherdash Server Binary
//!
//! Starts the weather query, AI, and dashboard HTTP surface.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use weatherdash_server::{config::ServerConfig, context::ServerContext, logging, server};

/// Command-line overrides applied on top of the environment
#[derive(Parser)]
#[command(name = "weatherdash-server")]
#[command(about = "Weather dashboard backend - live city weather, AI summaries, and dashboard views")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Do not start the dashboard pollers
    #[arg(long)]
    no_dashboard: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }
    if args.no_dashboard {
        config.dashboard.enabled = false;
    }

    logging::init_from_env()?;

    info!("Starting Weatherdash Server");
    info!("{}", config.summary());

    let context = Arc::new(ServerContext::from_config(config)?);
    server::run(context).await
}
