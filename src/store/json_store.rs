use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::ProgressData;

const PROGRESS_KEY: &str = "progress";

/// Key-value store with one JSON file per key under the data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(Self::default_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tippwerk")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Missing or unreadable entries come back as `T::default()`.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.file_path(key);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(key, %err, "stored value unreadable, using defaults");
                T::default()
            }),
            Err(err) => {
                tracing::warn!(key, %err, "failed to read stored value");
                T::default()
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Progress with a stale schema starts over.
    pub fn load_progress(&self) -> ProgressData {
        let progress: ProgressData = self.load(PROGRESS_KEY);
        if progress.needs_reset() {
            tracing::warn!(
                version = progress.schema_version,
                "progress schema changed, starting fresh"
            );
            return ProgressData::default();
        }
        progress
    }

    pub fn save_progress(&self, data: &ProgressData) -> Result<()> {
        self.save(PROGRESS_KEY, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_progress_is_default() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load_progress(), ProgressData::default());
    }

    #[test]
    fn test_progress_round_trip() {
        let (_dir, store) = make_test_store();
        let mut progress = ProgressData::default();
        progress.record_session(150, 2, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        store.save_progress(&progress).unwrap();

        let loaded = store.load_progress();
        assert_eq!(loaded, progress);
        assert!(!store.file_path("progress").with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path("progress"), "{ not json").unwrap();
        assert_eq!(store.load_progress(), ProgressData::default());
    }

    #[test]
    fn test_stale_schema_resets() {
        let (_dir, store) = make_test_store();
        let stale = ProgressData {
            schema_version: 99,
            high_score: 500,
            ..ProgressData::default()
        };
        store.save_progress(&stale).unwrap();
        assert_eq!(store.load_progress().high_score, 0);
    }

    #[test]
    fn test_generic_key_value() {
        let (_dir, store) = make_test_store();
        store.save("names", &vec!["Hund".to_string(), "Katze".to_string()]).unwrap();
        let names: Vec<String> = store.load("names");
        assert_eq!(names, vec!["Hund", "Katze"]);
        let missing: Vec<String> = store.load("absent");
        assert!(missing.is_empty());
    }
}
