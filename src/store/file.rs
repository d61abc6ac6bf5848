use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::app::{Result, XcliError};
use crate::domain::ItemId;
use crate::store::StateStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_seen_id: Option<ItemId>,
}

/// Unread cursor kept in a small JSON file.
///
/// Writes go to a sibling temp file which is flushed and then renamed over
/// the real one, so a crash mid-write leaves either the old or the new
/// cursor on disk. Assumes a single writing process.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<data_dir>/xcli/state.json`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| XcliError::Other("Could not find data directory".into()))?;
        Ok(data_dir.join("xcli").join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored cursor, distinguishing a missing file (`Ok(None)`)
    /// from an unreadable one.
    pub fn read(&self) -> Result<Option<ItemId>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| XcliError::StateCorrupt(format!("{}: {}", self.path.display(), e)))?;
        let state: StateFile = serde_json::from_str(&content)
            .map_err(|e| XcliError::StateCorrupt(format!("{}: {}", self.path.display(), e)))?;
        Ok(state.last_seen_id)
    }

    fn write(&self, cursor: &ItemId) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let state = StateFile {
            last_seen_id: Some(cursor.clone()),
        };
        let body = serde_json::to_string_pretty(&state)?;

        let tmp_path = self.tmp_path();
        if let Err(e) = replace_with(&tmp_path, &self.path, body.as_bytes()) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                debug!(path = %tmp_path.display(), error = %cleanup, "Temp file not removed");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn replace_with(tmp_path: &Path, path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(body)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp_path, path)
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Option<ItemId> {
        match self.read() {
            Ok(cursor) => cursor,
            Err(e) => {
                warn!("Treating unread cursor as absent: {}", e);
                None
            }
        }
    }

    fn save(&self, cursor: &ItemId) -> Result<()> {
        if let Some(current) = self.load() {
            if current >= *cursor {
                debug!(%current, requested = %cursor, "Unread cursor already up to date");
                return Ok(());
            }
        }
        self.write(cursor)?;
        info!(cursor = %cursor, path = %self.path.display(), "Saved unread cursor");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonStateStore {
        JsonStateStore::new(dir.path().join("state.json"))
    }

    #[test]
    fn test_load_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load(), None);
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&ItemId::from("123")).unwrap();
        assert_eq!(store.load(), Some(ItemId::from("123")));
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&ItemId::from("77")).unwrap();
        store.save(&ItemId::from("77")).unwrap();
        assert_eq!(store.load(), Some(ItemId::from("77")));
    }

    #[test]
    fn test_save_never_regresses() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&ItemId::from("10")).unwrap();
        store.save(&ItemId::from("9")).unwrap();
        assert_eq!(store.load(), Some(ItemId::from("10")));

        store.save(&ItemId::from("11")).unwrap();
        assert_eq!(store.load(), Some(ItemId::from("11")));
    }

    #[test]
    fn test_corrupt_file_degrades_to_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.read(), Err(XcliError::StateCorrupt(_))));
        assert_eq!(store.load(), None);

        // A later save replaces the corrupt file.
        store.save(&ItemId::from("5")).unwrap();
        assert_eq!(store.load(), Some(ItemId::from("5")));
    }

    #[test]
    fn test_file_format() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&ItemId::from("42")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "last_seen_id": "42" }));
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_empty_object_is_absent_not_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{}").unwrap();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::new(dir.path().join("nested/deeper/state.json"));
        store.save(&ItemId::from("1")).unwrap();
        assert_eq!(store.load(), Some(ItemId::from("1")));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let store = JsonStateStore::new(blocker.join("state.json"));

        assert!(store.save(&ItemId::from("1")).is_err());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        // A non-empty directory cannot be replaced by a file.
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("keep"), "x").unwrap();

        assert!(store.save(&ItemId::from("1")).is_err());
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_stale_temp_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&ItemId::from("5")).unwrap();
        fs::write(store.tmp_path(), "{ \"last_seen_id\": \"9").unwrap();

        assert_eq!(store.load(), Some(ItemId::from("5")));

        store.save(&ItemId::from("6")).unwrap();
        assert_eq!(store.load(), Some(ItemId::from("6")));
        assert!(!store.tmp_path().exists());
    }
}
