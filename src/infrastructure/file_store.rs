use crate::domain::ports::DatasetStore;
use crate::domain::skin::WeaponDataset;
use crate::error::{Result, SkinError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const JSON_DIR: &str = "json";
const HTML_DIR: &str = "html";

/// Stores datasets as pretty-printed JSON files.
///
/// Layout under the root directory:
/// - `json/<weapon>.json` holds the dataset
/// - `html/<weapon>.html` holds the markup it was extracted from
#[derive(Debug, Clone)]
pub struct FileDatasetStore {
    root: PathBuf,
}

impl FileDatasetStore {
    /// Opens a store rooted at `root`, creating its directories.
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(JSON_DIR)).await?;
        fs::create_dir_all(root.join(HTML_DIR)).await?;
        Ok(Self { root })
    }

    fn dataset_path(&self, weapon: &str) -> Result<PathBuf> {
        Ok(self
            .root
            .join(JSON_DIR)
            .join(format!("{}.json", checked_name(weapon)?)))
    }

    fn markup_path(&self, weapon: &str) -> Result<PathBuf> {
        Ok(self
            .root
            .join(HTML_DIR)
            .join(format!("{}.html", checked_name(weapon)?)))
    }
}

/// Dataset names become file names, so only plain identifiers are accepted.
fn checked_name(weapon: &str) -> Result<&str> {
    let valid = !weapon.is_empty()
        && weapon
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(weapon)
    } else {
        Err(SkinError::InvalidName(weapon.to_string()))
    }
}

#[async_trait]
impl DatasetStore for FileDatasetStore {
    async fn save(&self, dataset: &WeaponDataset) -> Result<()> {
        let path = self.dataset_path(&dataset.weapon)?;
        let json = serde_json::to_vec_pretty(dataset)?;
        // readers only ever see a complete file
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json).await?;
        fs::rename(&staging, &path).await?;
        debug!(path = %path.display(), "Saved dataset");
        Ok(())
    }

    async fn load(&self, weapon: &str) -> Result<Option<WeaponDataset>> {
        let Ok(path) = self.dataset_path(weapon) else {
            return Ok(None);
        };
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match fs::read_dir(self.root.join(JSON_DIR)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    async fn archive_markup(&self, weapon: &str, markup: &str) -> Result<()> {
        let path = self.markup_path(weapon)?;
        fs::write(&path, markup).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::denomination::DenominationTable;
    use crate::domain::skin::{PriceTag, Skin};
    use tempfile::tempdir;

    fn dataset(weapon: &str) -> WeaponDataset {
        let skin = Skin::priced(
            "Prime Vandal".to_string(),
            "Premium Edition".to_string(),
            PriceTag::Points(1775),
            None,
            &DenominationTable::default(),
        )
        .unwrap();
        WeaponDataset::new(weapon, vec![skin])
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileDatasetStore::open(dir.path()).await.unwrap();

        store.save(&dataset("vandal")).await.unwrap();
        let loaded = store.load("vandal").await.unwrap().unwrap();
        assert_eq!(loaded, dataset("vandal"));
        assert!(dir.path().join("json/vandal.json").exists());

        assert!(store.load("phantom").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_reads_during_rewrite_see_whole_dataset() {
        let dir = tempdir().unwrap();
        let store = FileDatasetStore::open(dir.path()).await.unwrap();
        store.save(&dataset("vandal")).await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    store.save(&dataset("vandal")).await.unwrap();
                }
            })
        };
        for _ in 0..50 {
            let loaded = store.load("vandal").await.unwrap();
            assert_eq!(loaded, Some(dataset("vandal")));
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        assert!(!dir.path().join("json/vandal.json.tmp").exists());
        assert_eq!(store.list().await.unwrap(), vec!["vandal"]);
    }

    #[tokio::test]
    async fn test_file_store_list_ignores_other_files() {
        let dir = tempdir().unwrap();
        let store = FileDatasetStore::open(dir.path()).await.unwrap();
        store.save(&dataset("vandal")).await.unwrap();
        store.save(&dataset("ares")).await.unwrap();
        std::fs::write(dir.path().join("json/notes.txt"), "x").unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["ares", "vandal"]);
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_names() {
        let dir = tempdir().unwrap();
        let store = FileDatasetStore::open(dir.path()).await.unwrap();

        assert!(store.load("../secret").await.unwrap().is_none());
        assert!(matches!(
            store.save(&WeaponDataset::new("a/b", vec![])).await,
            Err(SkinError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_file_store_archives_markup() {
        let dir = tempdir().unwrap();
        let store = FileDatasetStore::open(dir.path()).await.unwrap();
        store.archive_markup("odin", "<html/>").await.unwrap();

        let saved = std::fs::read_to_string(dir.path().join("html/odin.html")).unwrap();
        assert_eq!(saved, "<html/>");
    }
}
