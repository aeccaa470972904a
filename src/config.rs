//! Command line and environment configuration.
//!
//! Every option can also be supplied through a `VALOSKINS_*` environment
//! variable. The helpers here turn parsed options into the fetcher and store
//! the rest of the crate works with.

use crate::domain::ports::{FetcherBox, SharedDatasetStore};
use crate::error::Result;
use crate::infrastructure::directory_fetcher::DirectoryFetcher;
use crate::infrastructure::file_store::FileDatasetStore;
use crate::infrastructure::http_fetcher::HttpFetcher;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://www.thevalohub.com/gun";

/// Weapons refreshed when no explicit list is given.
pub const DEFAULT_WEAPONS: [&str; 18] = [
    "odin", "ares", "knife", "classic", "shorty", "frenzy", "ghost", "sheriff", "stinger",
    "spectre", "bucky", "judge", "bulldog", "guardian", "phantom", "vandal", "marshal",
    "operator",
];

/// Valorant skin catalogue with VP pack pricing
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API, refreshing first if no data is stored yet
    Serve(ServeArgs),
    /// Refresh every weapon dataset once and exit
    Refresh(RefreshArgs),
    /// Print the VP packs to buy for an amount
    Quote {
        /// Amount of VP to cover
        amount: u32,
    },
    /// List stored weapon datasets
    List(StoreArgs),
    /// Write one weapon dataset as CSV to stdout
    Export {
        /// Weapon dataset name
        weapon: String,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "VALOSKINS_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, env = "VALOSKINS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Do not refresh on startup when the store is empty
    #[arg(long)]
    pub no_bootstrap: bool,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RefreshArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory holding `json/` datasets and `html/` pages
    #[arg(long, env = "VALOSKINS_DATA_DIR", default_value = "valohub_weapons")]
    pub data_dir: PathBuf,

    /// Path to a RocksDB database. Requires the `storage-rocksdb` feature.
    #[arg(long, env = "VALOSKINS_DB_PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Base URL weapon pages are fetched from
    #[arg(long, env = "VALOSKINS_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Read `<weapon>.html` pages from this directory instead of the network
    #[arg(long, env = "VALOSKINS_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Comma separated weapons to refresh (defaults to every weapon)
    #[arg(long, env = "VALOSKINS_WEAPONS", value_delimiter = ',')]
    pub weapons: Vec<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "VALOSKINS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl StoreArgs {
    /// Opens the configured dataset store.
    ///
    /// `--db-path` selects RocksDB when the feature is compiled in; otherwise
    /// a warning is logged and the JSON file store is used.
    pub async fn open(&self) -> Result<SharedDatasetStore> {
        if let Some(db_path) = &self.db_path {
            #[cfg(feature = "storage-rocksdb")]
            {
                let store = crate::infrastructure::rocksdb::RocksDBStore::open(db_path)?;
                return Ok(Arc::new(store));
            }
            #[cfg(not(feature = "storage-rocksdb"))]
            tracing::warn!(
                path = %db_path.display(),
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to JSON file storage."
            );
        }
        Ok(Arc::new(FileDatasetStore::open(&self.data_dir).await?))
    }
}

impl SourceArgs {
    pub fn fetcher(&self) -> Result<FetcherBox> {
        match &self.source_dir {
            Some(dir) => Ok(Box::new(DirectoryFetcher::new(dir))),
            None => Ok(Box::new(HttpFetcher::new(
                &self.source_url,
                Duration::from_secs(self.timeout_secs),
            )?)),
        }
    }

    pub fn weapons(&self) -> Vec<String> {
        if self.weapons.is_empty() {
            DEFAULT_WEAPONS.iter().map(|w| w.to_string()).collect()
        } else {
            self.weapons.iter().map(|w| w.trim().to_lowercase()).collect()
        }
    }
}
