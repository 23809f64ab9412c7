//! Browser-side adapters
//!
//! Everything that touches `web-sys` lives here: the `localStorage`
//! key-value store, the lyrics-tree snapshotter, overlay DOM writes and
//! scroll control, player-state reads, fetch with timeouts, and the
//! mutation-observer driver that feeds the reconciler.
//!
//! ## Modules
//!
//! - `storage`: `KeyValueStore` over `window.localStorage`
//! - `snapshot`: live lyrics tree -> `HostNode<Element>` snapshots
//! - `overlay`: overlay injection, active-state refresh, scroll centering
//! - `player`: track identity from the host player globals / DOM fallback
//! - `fetch`: timeout-bounded HTTP through the page's `fetch`
//! - `driver`: observer wiring, debounce, and the `OverlayHost` impl

pub mod driver;
pub mod fetch;
pub mod overlay;
pub mod player;
pub mod snapshot;
pub mod storage;

pub use driver::install;
pub use storage::LocalStorageStore;

/// Render a JS error value for log output.
pub(crate) fn js_error_string(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
