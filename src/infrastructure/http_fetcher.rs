use crate::domain::ports::Fetcher;
use crate::error::{Result, SkinError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("valoskins/", env!("CARGO_PKG_VERSION"));

/// Fetches weapon pages over HTTP(S) from `{base_url}/{weapon}`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn page_url(&self, weapon: &str) -> String {
        format!("{}/{}", self.base_url, weapon)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, weapon: &str) -> Result<String> {
        let url = self.page_url(weapon);
        debug!(%url, "Fetching page");

        let fail = |e: reqwest::Error| SkinError::Fetch {
            weapon: weapon.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fail)?;
        response.text().await.map_err(fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_trims_trailing_slash() {
        let fetcher =
            HttpFetcher::new("https://www.thevalohub.com/gun/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            fetcher.page_url("vandal"),
            "https://www.thevalohub.com/gun/vandal"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch("vandal").await.unwrap_err();
        assert!(matches!(err, SkinError::Fetch { ref weapon, .. } if weapon == "vandal"));
    }
}
