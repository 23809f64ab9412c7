//! Lyrics Translation Overlay WASM Module
//!
//! Overlays machine-translated text onto a synchronized lyrics display
//! rendered by a third-party host UI. The host re-renders the lyric DOM
//! frequently and without notice, so the core of this module is the line
//! extraction, alignment, and synchronization engine: reconstructing
//! stable logical lines from nested karaoke markup, fuzzy-matching a
//! whole-song translation onto them, tiered caching, and a
//! mutation-driven reconciliation loop that keeps the injected overlays
//! correct without flicker or duplication.

pub mod align;
pub mod api;
pub mod cache;
pub mod config;
pub mod dom;
pub mod errors;
pub mod extract;
pub mod models;
pub mod net;
pub mod sync;
pub mod text;

// Re-export commonly used types
pub use align::{align_lines, LineAlignmentEntry, MATCH_THRESHOLD};
pub use errors::OverlayError;
pub use extract::{content_checksum, extract_blocks};
pub use models::{HostNode, TrackIdentity, VocalBlock, VoiceRole};
pub use sync::{OverlayHost, PassOutcome, Reconciler};
pub use text::normalize;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Lyrics translation overlay module initialized");
    dom::install();
}
