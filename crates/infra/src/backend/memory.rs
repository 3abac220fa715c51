use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value as JsonValue;

use super::{KeyValueBackend, UpdateFn};
use crate::error::StoreError;

/// In-memory backend for tests/dev.
///
/// Can be switched offline to exercise `StoreError::Unavailable` paths.
#[derive(Debug)]
pub struct MemoryBackend {
    inner: RwLock<HashMap<String, JsonValue>>,
    online: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
        }
    }

    /// Simulate the backend becoming (un)reachable.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable("memory backend is offline"))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        self.ensure_online()?;
        let map = self
            .inner
            .read()
            .map_err(|e| StoreError::unavailable(format!("failed to acquire read lock: {e}")))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut map = self
            .inner
            .write()
            .map_err(|e| StoreError::unavailable(format!("failed to acquire write lock: {e}")))?;
        map.insert(key.to_string(), value);
        Ok(())
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| StoreError::unavailable(format!("failed to acquire write lock: {e}")))?;
        self.ensure_online()?;
        let next = f(map.get(key).cloned())?;
        // Re-check so a backend taken offline mid-update does not commit.
        self.ensure_online()?;
        map.insert(key.to_string(), next);
        Ok(())
    }
}
