//! Key-value storage abstraction
//!
//! The cache tiers are written against this trait so they run unchanged
//! over browser `localStorage` (see `dom::storage`) and over the in-memory
//! store used by tests and by the storage-failure degradation path.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::OverlayError;

/// Synchronous string key-value store.
///
/// Values are JSON-encoded structured text; the cache tiers own the
/// encoding. Implementations must be cheap to clone, since each tier
/// holds its own handle to the same backing store.
pub trait KeyValueStore: Clone {
    fn get(&self, key: &str) -> Result<Option<String>, OverlayError>;
    fn set(&self, key: &str, value: &str) -> Result<(), OverlayError>;
    fn remove(&self, key: &str) -> Result<(), OverlayError>;
}

/// In-memory store backed by a shared map.
///
/// Clones share the same map, mirroring how every `localStorage` handle
/// reaches the same persisted data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, OverlayError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), OverlayError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), OverlayError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read a JSON value, degrading any failure to a miss.
pub(crate) fn read_json<S: KeyValueStore, T: serde::de::DeserializeOwned>(
    store: &S,
    key: &str,
) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("discarding corrupt cache entry under {key}: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("cache read failed for {key}: {e}");
            None
        }
    }
}

/// Write a JSON value, dropping the write on any failure.
pub(crate) fn write_json<S: KeyValueStore, T: serde::Serialize>(store: &S, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("cache serialization failed for {key}: {e}");
            return;
        }
    };
    if let Err(e) = store.set(key, &raw) {
        log::warn!("cache write dropped for {key}: {e}");
    }
}
