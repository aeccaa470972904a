//! Axum routes for the skin API.

use crate::application::coordinator::{TriggerOutcome, UpdateCoordinator, UpdateStatus};
use crate::domain::denomination::DenominationTable;
use crate::domain::ports::SharedDatasetStore;
use crate::error::{Result, SkinError};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub store: SharedDatasetStore,
    pub coordinator: Arc<UpdateCoordinator>,
    pub table: DenominationTable,
}

#[derive(Serialize)]
struct Quote {
    price_vp: u32,
    #[serde(with = "rust_decimal::serde::float")]
    price_usd: Decimal,
    units_covered: u64,
    optimal_vp_packs: Vec<String>,
}

// ─── Route builder ───────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/weapons", get(list_weapons))
        .route("/weapons/:weapon", get(get_weapon))
        .route("/update", get(trigger_update))
        .route("/update/status", get(update_status))
        .route("/quote/:amount", get(quote))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Handlers ────────────────────────────────────────────────────

async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let weapons = state.store.list().await?;
    Ok(Json(serde_json::json!({
        "service": "valoskins",
        "version": env!("CARGO_PKG_VERSION"),
        "weapons": weapons,
        "endpoints": [
            "GET /weapons",
            "GET /weapons/{weapon}",
            "GET /update",
            "GET /update/status",
            "GET /quote/{amount}",
        ],
    })))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_weapons(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let weapons = state.store.list().await?;
    Ok(Json(serde_json::json!({ "weapons": weapons })))
}

async fn get_weapon(
    State(state): State<Arc<AppState>>,
    Path(weapon): Path<String>,
) -> Result<impl IntoResponse> {
    let dataset = state
        .store
        .load(&weapon)
        .await?
        .ok_or(SkinError::DatasetNotFound(weapon))?;
    Ok(Json(dataset))
}

async fn trigger_update(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.coordinator.trigger();
    let message = match outcome {
        TriggerOutcome::Started => "Data refresh started. Poll /update/status for progress.",
        TriggerOutcome::AlreadyUpdating => "A data refresh is already running.",
    };
    Json(serde_json::json!({ "status": outcome, "message": message }))
}

async fn update_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.coordinator.status();
    let message = match status {
        UpdateStatus::Updating => "Loading data...",
        UpdateStatus::Ready => "Data is up to date.",
    };
    Json(serde_json::json!({ "status": status, "message": message }))
}

async fn quote(
    State(state): State<Arc<AppState>>,
    Path(amount): Path<u32>,
) -> Result<impl IntoResponse> {
    let plan = state.table.compute_cost(amount)?;
    Ok(Json(Quote {
        price_vp: amount,
        price_usd: plan.total_cost,
        units_covered: plan.units_covered(),
        optimal_vp_packs: plan.formatted_packs(),
    }))
}

// ─── Server startup ──────────────────────────────────────────────

/// Serves the API until ctrl-c.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully");
}
