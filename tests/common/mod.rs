#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use valoskins::application::coordinator::UpdateCoordinator;
use valoskins::application::pipeline::RefreshPipeline;
use valoskins::domain::denomination::DenominationTable;
use valoskins::infrastructure::in_memory::{InMemoryDatasetStore, InMemoryFetcher};
use valoskins::interfaces::html::SkinExtractor;
use valoskins::interfaces::http::AppState;

pub fn pages_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pages")
}

pub fn page(weapon: &str) -> String {
    std::fs::read_to_string(pages_dir().join(format!("{weapon}.html")))
        .expect("Failed to read fixture page")
}

/// App state over an in-memory store, refreshed from the fixture pages.
pub fn fixture_state(weapons: &[&str]) -> (Arc<AppState>, InMemoryDatasetStore) {
    let store = InMemoryDatasetStore::new();
    let fetcher = InMemoryFetcher::new([("vandal", page("vandal")), ("odin", page("odin"))]);
    let pipeline = RefreshPipeline::new(
        Box::new(fetcher),
        Arc::new(store.clone()),
        SkinExtractor::default(),
        weapons.iter().map(|w| w.to_string()).collect(),
    );

    let state = Arc::new(AppState {
        store: Arc::new(store.clone()),
        coordinator: Arc::new(UpdateCoordinator::new(Arc::new(pipeline))),
        table: DenominationTable::default(),
    });
    (state, store)
}
