//! JavaScript-facing API
//!
//! The in-page control surface for the overlay: endpoint configuration and
//! inspection, availability probing, track reporting, and the target
//! language. All functions are exposed with camelCase `js_name`s and
//! return plain JS values via `serde-wasm-bindgen`.

pub mod control;
pub mod helpers;

pub use control::*;
