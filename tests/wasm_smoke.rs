//! WASM build test
//!
//! Exercises the JS-facing control surface inside a real browser
//! environment: endpoint configuration round-trips through localStorage
//! and results serialize into plain JS values.

#![cfg(target_arch = "wasm32")]

use translator_wasm::api::control;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_rejects_non_http_endpoint() {
    assert!(control::set_endpoint_override("ftp://nope").is_err());
    assert!(control::set_endpoint_override("not a url").is_err());
}

#[wasm_bindgen_test]
fn test_endpoint_override_round_trip() {
    control::set_endpoint_override("https://manual.example").unwrap();
    let resolved = control::resolved_endpoint().unwrap();
    assert!(resolved.is_object(), "resolved endpoint serializes to a JS object");
    control::clear_endpoint_override();
}

#[wasm_bindgen_test]
fn test_default_target_language() {
    assert_eq!(control::target_language(), "es");
}

#[wasm_bindgen_test]
fn test_rejects_empty_language_code() {
    assert!(control::set_target_language("  ").is_err());
}
