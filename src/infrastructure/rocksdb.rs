use crate::domain::ports::DatasetStore;
use crate::domain::skin::WeaponDataset;
use crate::error::{Result, SkinError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing weapon datasets as JSON.
pub const CF_DATASETS: &str = "datasets";
/// Column Family for storing the markup each dataset came from.
pub const CF_MARKUP: &str = "markup";

/// A persistent dataset store backed by RocksDB.
///
/// Datasets and archived markup live in separate Column Families, keyed by
/// weapon name. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_datasets = ColumnFamilyDescriptor::new(CF_DATASETS, Options::default());
        let cf_markup = ColumnFamilyDescriptor::new(CF_MARKUP, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_datasets, cf_markup])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            SkinError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }
}

#[async_trait]
impl DatasetStore for RocksDBStore {
    async fn save(&self, dataset: &WeaponDataset) -> Result<()> {
        let cf = self.cf(CF_DATASETS)?;
        let value = serde_json::to_vec(dataset)?;
        self.db.put_cf(cf, dataset.weapon.as_bytes(), value)?;
        Ok(())
    }

    async fn load(&self, weapon: &str) -> Result<Option<WeaponDataset>> {
        let cf = self.cf(CF_DATASETS)?;
        match self.db.get_cf(cf, weapon.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let cf = self.cf(CF_DATASETS)?;
        let mut names = Vec::new();

        // Keys iterate in byte order, which is already sorted for names.
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (key, _value) = item?;
            let name = String::from_utf8(key.into_vec()).map_err(|e| {
                SkinError::InternalError(Box::new(std::io::Error::other(format!(
                    "Non UTF-8 dataset key: {e}"
                ))))
            })?;
            names.push(name);
        }

        Ok(names)
    }

    async fn archive_markup(&self, weapon: &str, markup: &str) -> Result<()> {
        let cf = self.cf(CF_MARKUP)?;
        self.db.put_cf(cf, weapon.as_bytes(), markup.as_bytes())?;
        Ok(())
    }
}
