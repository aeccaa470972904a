use super::skin::WeaponDataset;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Retrieves the raw markup listing the skins of one weapon.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, weapon: &str) -> Result<String>;
}

/// Persists weapon datasets by name.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    async fn save(&self, dataset: &WeaponDataset) -> Result<()>;
    async fn load(&self, weapon: &str) -> Result<Option<WeaponDataset>>;
    /// Names of every stored dataset, sorted.
    async fn list(&self) -> Result<Vec<String>>;
    /// Keeps the markup a dataset was extracted from.
    async fn archive_markup(&self, weapon: &str, markup: &str) -> Result<()>;
}

/// A unit of refresh work run by the update coordinator.
#[async_trait]
pub trait Refresh: Send + Sync {
    async fn refresh(&self) -> Result<RefreshReport>;
}

/// Outcome of one refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub saved: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl RefreshReport {
    pub fn attempted(&self) -> usize {
        self.saved.len() + self.failed.len()
    }
}

pub type FetcherBox = Box<dyn Fetcher>;
pub type SharedDatasetStore = Arc<dyn DatasetStore>;
