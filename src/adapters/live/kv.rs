//! Live key-value store persisted as one JSON object per document.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::replace_file;
use crate::ports::{KeyValueStore, PortError};

/// Key-value store kept in a JSON file.
///
/// Every `set` rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written state file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PortError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {e}", self.path.display()).into())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        replace_file(&self.path, &serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("doc.md.state.json"));
        assert_eq!(store.get("comment_map").unwrap(), None);
    }

    #[test]
    fn set_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/doc.md.state.json");

        JsonFileStore::new(&path)
            .set("chat_session_id", "sess-1")
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        let session = reopened.get("chat_session_id").unwrap();
        assert_eq!(session.as_deref(), Some("sess-1"));
        let leftover = dir.path().join("nested/state/doc.md.state.json.tmp");
        assert!(!leftover.exists());
    }

    #[test]
    fn set_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("s.json"));

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("a", "3").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let err = JsonFileStore::new(&path).get("a").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
