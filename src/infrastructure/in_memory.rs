use crate::domain::ports::{DatasetStore, Fetcher};
use crate::domain::skin::WeaponDataset;
use crate::error::{Result, SkinError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory dataset store.
///
/// Uses `Arc<RwLock<HashMap<..>>>` so clones share the same datasets.
/// Suited to tests and to runs where nothing should touch the disk.
#[derive(Default, Clone)]
pub struct InMemoryDatasetStore {
    datasets: Arc<RwLock<HashMap<String, WeaponDataset>>>,
    markup: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryDatasetStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup archived for `weapon`, if any.
    pub async fn markup(&self, weapon: &str) -> Option<String> {
        self.markup.read().await.get(weapon).cloned()
    }
}

#[async_trait]
impl DatasetStore for InMemoryDatasetStore {
    async fn save(&self, dataset: &WeaponDataset) -> Result<()> {
        let mut datasets = self.datasets.write().await;
        datasets.insert(dataset.weapon.clone(), dataset.clone());
        Ok(())
    }

    async fn load(&self, weapon: &str) -> Result<Option<WeaponDataset>> {
        let datasets = self.datasets.read().await;
        Ok(datasets.get(weapon).cloned())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let datasets = self.datasets.read().await;
        let mut names: Vec<String> = datasets.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn archive_markup(&self, weapon: &str, markup: &str) -> Result<()> {
        let mut pages = self.markup.write().await;
        pages.insert(weapon.to_string(), markup.to_string());
        Ok(())
    }
}

/// Serves pages from memory. Weapons without a page fail like a 404 would.
#[derive(Default, Clone)]
pub struct InMemoryFetcher {
    pages: Arc<HashMap<String, String>>,
}

impl InMemoryFetcher {
    pub fn new<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl Fetcher for InMemoryFetcher {
    async fn fetch(&self, weapon: &str) -> Result<String> {
        self.pages.get(weapon).cloned().ok_or_else(|| SkinError::Fetch {
            weapon: weapon.to_string(),
            reason: "no such page".to_string(),
        })
    }
}
