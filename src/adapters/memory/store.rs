//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::ports::{KeyValueStore, PortError};

#[derive(Debug, Default)]
struct StoreState {
    values: HashMap<String, String>,
    write_failure: Option<String>,
}

/// Key-value store held in a shared map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`, bypassing the port.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Makes every later `set` fail with `message`. Reads keep working.
    pub fn fail_writes(&self, message: impl Into<String>) {
        self.lock().write_failure = Some(message.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store lock poisoned")
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        Ok(self.lock().values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        let mut state = self.lock();
        if let Some(message) = &state.write_failure {
            return Err(message.clone().into());
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_writes_leave_values_untouched() {
        let store = InMemoryStore::new();
        store.set("comment_map", "{}").unwrap();
        store.fail_writes("disk full");

        let err = store.set("comment_map", "{\"a1\":{}}").unwrap_err();

        assert_eq!(err.to_string(), "disk full");
        assert_eq!(store.get("comment_map").unwrap().as_deref(), Some("{}"));
    }
}
