//! Shared helpers for the JS-facing API
//!
//! Serialization and error-shaping utilities common to the control
//! surface functions.

use serde::Serialize;
use wasm_bindgen::JsValue;

/// Serialize a value for the JS caller, shaping failures as JS errors.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{msg}");
        JsValue::from_str(&msg)
    })
}

/// Shape a plain message as a JS error value, logging it on the way out.
pub fn js_error(msg: &str) -> JsValue {
    log::error!("{msg}");
    JsValue::from_str(msg)
}
