// ABOUTME: Dashboard route handlers serving the current panel views
// ABOUTME: Supports manual refetch of one card or of every panel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::context::ServerContext;
use crate::dashboard::{Dashboard, DashboardView};
use crate::errors::{AppError, AppResult};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for a manual refetch
#[derive(Debug, Deserialize)]
struct RefetchParams {
    city: Option<String>,
}

/// Dashboard routes
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create the dashboard routes
    pub fn routes(context: Arc<ServerContext>) -> Router {
        Router::new()
            .route("/api/dashboard", get(Self::handle_view))
            .route("/api/dashboard/refetch", post(Self::handle_refetch))
            .with_state(context)
    }

    fn mounted(context: &ServerContext) -> AppResult<&Arc<Dashboard>> {
        context
            .dashboard()
            .ok_or_else(|| AppError::not_found("Dashboard"))
    }

    async fn handle_view(State(context): State<Arc<ServerContext>>) -> AppResult<Json<DashboardView>> {
        Ok(Json(Self::mounted(&context)?.view()))
    }

    async fn handle_refetch(
        State(context): State<Arc<ServerContext>>,
        Query(params): Query<RefetchParams>,
    ) -> AppResult<StatusCode> {
        let dashboard = Self::mounted(&context)?;
        let Some(city) = params.city.as_deref() else {
            dashboard.refetch_all();
            return Ok(StatusCode::ACCEPTED);
        };
        if dashboard.refetch_city(city) {
            Ok(StatusCode::ACCEPTED)
        } else {
            Err(AppError::not_found(format!("Dashboard card '{city}'")))
        }
    }
}
