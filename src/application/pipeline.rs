use crate::domain::ports::{FetcherBox, Refresh, RefreshReport, SharedDatasetStore};
use crate::error::Result;
use crate::interfaces::html::SkinExtractor;
use async_trait::async_trait;
use tracing::{info, warn};

/// Fetches, extracts and persists the dataset of every configured weapon.
///
/// Weapons are processed one after the other. A weapon that fails at any
/// step is logged and recorded in the report; the others still run.
pub struct RefreshPipeline {
    fetcher: FetcherBox,
    store: SharedDatasetStore,
    extractor: SkinExtractor,
    weapons: Vec<String>,
}

impl RefreshPipeline {
    pub fn new(
        fetcher: FetcherBox,
        store: SharedDatasetStore,
        extractor: SkinExtractor,
        weapons: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            store,
            extractor,
            weapons,
        }
    }

    async fn refresh_weapon(&self, weapon: &str) -> Result<usize> {
        let markup = self.fetcher.fetch(weapon).await?;
        self.store.archive_markup(weapon, &markup).await?;

        let dataset = self.extractor.extract(weapon, &markup);
        let count = dataset.skins.len();
        self.store.save(&dataset).await?;
        Ok(count)
    }
}

#[async_trait]
impl Refresh for RefreshPipeline {
    async fn refresh(&self) -> Result<RefreshReport> {
        let mut report = RefreshReport::default();

        for weapon in &self.weapons {
            match self.refresh_weapon(weapon).await {
                Ok(skins) => {
                    info!(weapon, skins, "Saved dataset");
                    report.saved.push(weapon.clone());
                }
                Err(e) => {
                    warn!(weapon, error = %e, "Failed to refresh weapon");
                    report.failed.push((weapon.clone(), e.to_string()));
                }
            }
        }

        info!(
            saved = report.saved.len(),
            total = report.attempted(),
            "Refresh finished"
        );
        Ok(report)
    }
}
