//! Persistent storage over `window.localStorage`
//!
//! Values are whatever JSON the cache tiers hand us. Any storage failure
//! (private mode, quota, detached window) surfaces as `StorageFailure`,
//! which the tiers degrade to a miss or a dropped write.

use crate::cache::KeyValueStore;
use crate::dom::js_error_string;
use crate::errors::OverlayError;

/// `KeyValueStore` backed by the page's `localStorage`.
#[derive(Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<web_sys::Storage, OverlayError> {
        web_sys::window()
            .ok_or_else(|| OverlayError::StorageFailure("no window".to_string()))?
            .local_storage()
            .map_err(|e| OverlayError::StorageFailure(js_error_string(&e)))?
            .ok_or_else(|| OverlayError::StorageFailure("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, OverlayError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| OverlayError::StorageFailure(js_error_string(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), OverlayError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| OverlayError::StorageFailure(js_error_string(&e)))
    }

    fn remove(&self, key: &str) -> Result<(), OverlayError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| OverlayError::StorageFailure(js_error_string(&e)))
    }
}
