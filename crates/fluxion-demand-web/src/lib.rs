// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

pub mod charts;
pub mod dashboard;
pub mod figure;

pub use dashboard::{
    AggregationLevel, ChartId, DashboardShell, DashboardState, DashboardTemplate, Selection,
    UnknownChart, render,
};
pub use figure::Figure;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use fluxion_demand_core::{ComputedAggregates, CostBreakdown, EnergyBalance, SeasonEstimate};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

/// Application state for web handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub aggregates: Arc<ComputedAggregates>,
}

/// Key figures served by `/api/metrics`
#[derive(Debug, Serialize)]
struct MetricsResponse<'a> {
    annual_radiation_kwh_m2: f64,
    seasons: &'a [SeasonEstimate],
    balance: &'a EnergyBalance,
    costs: &'a CostBreakdown,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_router(aggregates: Arc<ComputedAggregates>) -> Router {
    let state = AppState { aggregates };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/charts/{chart_id}", get(chart_handler))
        .route("/api/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the dashboard until Ctrl-C or SIGTERM
///
/// # Errors
/// Returns error if the listener cannot bind or the server fails
pub async fn start_web_server(
    aggregates: Arc<ComputedAggregates>,
    bind_address: &str,
    port: u16,
) -> std::io::Result<()> {
    let app = build_router(aggregates);

    let addr = format!("{bind_address}:{port}");
    info!("Starting dashboard on http://{addr}/");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Main dashboard page handler
async fn index_handler(State(state): State<AppState>) -> Response {
    debug!("Dashboard page requested");

    let shell = DashboardShell::new(state.aggregates);
    let rendered = shell
        .page()
        .map_err(|e| e.to_string())
        .and_then(|page| page.render().map_err(|e| e.to_string()));

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render dashboard");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!(
                    "<html><body><h1>Error</h1><p>Failed to render dashboard: {e}</p></body></html>"
                )),
            )
                .into_response()
        }
    }
}

/// Figure JSON for one chart under the requested selector values
async fn chart_handler(
    State(state): State<AppState>,
    Path(chart_id): Path<String>,
    Query(selectors): Query<DashboardState>,
) -> Response {
    match chart_id.parse::<ChartId>() {
        Ok(chart) => {
            debug!(chart = %chart, ?selectors, "Chart requested");
            Json(render(&state.aggregates, selectors, chart)).into_response()
        }
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let aggregates = &state.aggregates;
    Json(MetricsResponse {
        annual_radiation_kwh_m2: aggregates.radiation.annual_kwh_m2,
        seasons: &aggregates.radiation.seasons,
        balance: &aggregates.balance,
        costs: &aggregates.costs,
    })
    .into_response()
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
