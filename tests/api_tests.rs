use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower::ServiceExt;
use valoskins::application::coordinator::UpdateCoordinator;
use valoskins::domain::denomination::DenominationTable;
use valoskins::domain::ports::{Refresh, RefreshReport};
use valoskins::error::Result;
use valoskins::infrastructure::in_memory::InMemoryDatasetStore;
use valoskins::interfaces::http::{AppState, build_router};

mod common;

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_status_ready_before_update() {
    let (state, _store) = common::fixture_state(&["vandal"]);
    let (status, body) = get(&state, "/update/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_unknown_weapon_is_not_found() {
    let (state, _store) = common::fixture_state(&["vandal"]);

    let (status, body) = get(&state, "/weapons/vandal").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Weapon not found");

    let (status, _) = get(&state, "/weapons/..%2F..%2Fetc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_then_browse() {
    let (state, _store) = common::fixture_state(&["vandal", "odin"]);

    let (status, body) = get(&state, "/weapons").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weapons"], serde_json::json!([]));

    let (_, body) = get(&state, "/update").await;
    assert_eq!(body["status"], "started");
    state.coordinator.wait_ready().await;

    let (_, body) = get(&state, "/update/status").await;
    assert_eq!(body["status"], "ready");

    let (_, body) = get(&state, "/weapons").await;
    assert_eq!(body["weapons"], serde_json::json!(["odin", "vandal"]));

    let (status, body) = get(&state, "/weapons/vandal").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weapon"], "vandal");
    assert_eq!(body["skins"][0]["name"], "Prime Vandal");
    assert!(body["skins"][0]["price_usd"].is_number());
    assert_eq!(body["skins"][0]["price_usd"], 19.97);
}

/// Holds the refresh open until the test releases it.
struct HeldRefresh(Semaphore);

#[async_trait]
impl Refresh for HeldRefresh {
    async fn refresh(&self) -> Result<RefreshReport> {
        self.0.acquire().await.unwrap().forget();
        Ok(RefreshReport::default())
    }
}

#[tokio::test]
async fn test_update_while_running_reports_already_updating() {
    let task = Arc::new(HeldRefresh(Semaphore::new(0)));
    let state = Arc::new(AppState {
        store: Arc::new(InMemoryDatasetStore::new()),
        coordinator: Arc::new(UpdateCoordinator::new(task.clone())),
        table: DenominationTable::default(),
    });

    let (_, body) = get(&state, "/update").await;
    assert_eq!(body["status"], "started");

    let (status, body) = get(&state, "/update").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "already updating");

    let (_, body) = get(&state, "/update/status").await;
    assert_eq!(body["status"], "updating");

    task.0.add_permits(1);
    state.coordinator.wait_ready().await;
    let (_, body) = get(&state, "/update/status").await;
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_quote() {
    let (state, _store) = common::fixture_state(&[]);

    let (status, body) = get(&state, "/quote/2051").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["price_usd"].is_number());
    assert_eq!(body["price_usd"], 24.98);
    assert_eq!(
        body["optimal_vp_packs"],
        serde_json::json!(["2050 VP ($19.99)", "475 VP ($4.99)"])
    );

    let (status, _) = get(&state, "/quote/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_and_health() {
    let (state, _store) = common::fixture_state(&[]);

    let (status, body) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "valoskins");
}
