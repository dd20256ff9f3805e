use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::store::{KeyValueStore, StorageKey, StorageResult};

/// On-disk store keeping one JSON file per key
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!(dir = %dir.display(), "File storage opened");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        // Readers never see a half-written record
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get(&StorageKey::UserData).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).await.unwrap();

        store
            .set(&StorageKey::UserData, r#"{"bookmarks":[1]}"#.to_string())
            .await
            .unwrap();
        store
            .set(&StorageKey::UserData, r#"{"bookmarks":[2]}"#.to_string())
            .await
            .unwrap();

        let value = store.get(&StorageKey::UserData).await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"bookmarks":[2]}"#));
        assert!(dir.path().join("nested").join("userData.json").exists());
        assert!(!dir.path().join("nested").join("userData.json.tmp").exists());
    }
}
