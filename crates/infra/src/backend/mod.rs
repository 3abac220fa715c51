//! Key-value persistence of JSON documents.
//!
//! The point-of-sale state is three documents: the item list, the invoice
//! list and the invoice counter. Backends store each under a string key.

pub mod json_file;
pub mod memory;

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::StoreError;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Callback for [`KeyValueBackend::update`]: receives the current document
/// (if any) and returns the replacement.
pub type UpdateFn<'a> = dyn FnMut(Option<JsonValue>) -> Result<JsonValue, StoreError> + 'a;

pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError>;

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError>;

    /// Read-modify-write of one key as a single indivisible step.
    ///
    /// No other `set`/`update` on the same backend interleaves with it. If the
    /// callback fails, or the new value cannot be persisted, the stored value
    /// is left unchanged.
    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<(), StoreError>;
}

impl<S> KeyValueBackend for Arc<S>
where
    S: KeyValueBackend + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        (**self).update(key, f)
    }
}
