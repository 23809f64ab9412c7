//! Control surface operations
//!
//! Everything a user (or the host page's console) can ask the overlay to
//! do: configure the backend endpoint, inspect how it was resolved, probe
//! availability, report the detected track, and change the target
//! language.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{js_error, serialize};
use crate::cache::KeyValueStore;
use crate::config::{Config, TARGET_LANGUAGE_KEY};
use crate::dom::driver::{self, endpoint_cache};
use crate::dom::storage::LocalStorageStore;
use crate::dom::{fetch, player};
use crate::net;
use wasm_bindgen_futures::spawn_local;

/// Set the manual endpoint override. Takes precedence over discovery
/// unconditionally until cleared.
#[wasm_bindgen(js_name = setEndpointOverride)]
pub fn set_endpoint_override(url: &str) -> Result<(), JsValue> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(js_error("endpoint URL must start with http:// or https://"));
    }
    endpoint_cache().set_override(url);
    log::info!("manual endpoint configured: {url}");
    driver::schedule_pass();
    Ok(())
}

/// Clear the manual override and fall back to remote discovery, kicking
/// off a fresh descriptor fetch immediately.
#[wasm_bindgen(js_name = clearEndpointOverride)]
pub fn clear_endpoint_override() {
    endpoint_cache().clear_override();
    log::info!("manual endpoint cleared; using remote discovery");
    spawn_local(driver::refresh_descriptor(true));
}

/// The currently resolved endpoint and where it came from, as
/// `{url, source}` with source one of `manual`, `remote-discovered`,
/// `default`, `none`.
#[wasm_bindgen(js_name = resolvedEndpoint)]
pub fn resolved_endpoint() -> Result<JsValue, JsValue> {
    let resolved = endpoint_cache().resolve(js_sys::Date::now());
    serialize(&resolved, "failed to serialize resolved endpoint")
}

/// Probe the resolved endpoint's availability. Resolves to `true` when
/// the backend answers its ping with a 2xx.
#[wasm_bindgen(js_name = probeEndpoint)]
pub async fn probe_endpoint() -> Result<JsValue, JsValue> {
    let resolved = endpoint_cache().resolve(js_sys::Date::now());
    let Some(base) = resolved.url else {
        return Err(js_error("no endpoint configured"));
    };
    let available = fetch::probe(&net::ping_url(&base), Config::default().ping_timeout_ms).await;
    Ok(JsValue::from_bool(available))
}

/// The currently detected track identity, or `null` when unknown.
#[wasm_bindgen(js_name = currentTrack)]
pub fn current_track() -> Result<JsValue, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| js_error("no document"))?;
    match player::current_track(&document) {
        Some(track) => serialize(&track, "failed to serialize track"),
        None => Ok(JsValue::NULL),
    }
}

/// The active target language code.
#[wasm_bindgen(js_name = targetLanguage)]
pub fn target_language() -> String {
    driver::with_reconciler(|r| r.target_language().to_string())
        .unwrap_or_else(|| Config::default().target_language)
}

/// Change the target language. Persisted, and applied to the live loop,
/// which re-translates on its next pass.
#[wasm_bindgen(js_name = setTargetLanguage)]
pub fn set_target_language(lang: &str) -> Result<(), JsValue> {
    let lang = lang.trim();
    if lang.is_empty() {
        return Err(js_error("language code must be non-empty"));
    }
    if let Err(e) = LocalStorageStore::new().set(TARGET_LANGUAGE_KEY, lang) {
        log::warn!("target language not persisted: {e}");
    }
    driver::with_reconciler(|r| r.set_target_language(lang));
    driver::schedule_pass();
    Ok(())
}
