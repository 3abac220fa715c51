use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use super::{KeyValueBackend, UpdateFn};
use crate::error::StoreError;

/// One JSON file per key inside a data directory.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// reader never observes a half-written document. A process-wide mutex
/// serializes writers; the backend assumes it is the only process using the
/// directory.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    /// Open (creating if needed) a data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        tracing::info!(dir = %dir.display(), "opened json file store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::unavailable(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn read(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::corrupt(key, e.to_string()))
    }

    fn write(&self, key: &str, value: &JsonValue) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::corrupt(key, e.to_string()))?;

        let mut file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
        file.write_all(&bytes).map_err(|e| io_error(&tmp, e))?;
        file.sync_all().map_err(|e| io_error(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))
    }
}

fn io_error(path: &Path, err: io::Error) -> StoreError {
    StoreError::unavailable(format!("{}: {err}", path.display()))
}

impl KeyValueBackend for JsonFileBackend {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        self.read(key)
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::unavailable(format!("failed to acquire write lock: {e}")))?;
        self.write(key, &value)
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::unavailable(format!("failed to acquire write lock: {e}")))?;
        let current = self.read(key)?;
        let next = f(current)?;
        self.write(key, &next)
    }
}
