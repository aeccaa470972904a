use crate::domain::ports::Fetcher;
use crate::error::{Result, SkinError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads weapon pages from `{dir}/{weapon}.html`, for mirrored or offline runs.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, weapon: &str) -> Result<String> {
        let path = self.dir.join(format!("{weapon}.html"));
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SkinError::Fetch {
                weapon: weapon.to_string(),
                reason: format!("{}: {e}", path.display()),
            })
    }
}
