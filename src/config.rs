//! Tuning constants
//!
//! Collected in one struct so the reconciler, the driver, and the control
//! surface agree on timings and capacities. Only the target language is
//! user-visible; it is persisted separately under [`TARGET_LANGUAGE_KEY`]
//! and loaded back into the config at install time.

/// Storage key for the persisted target language.
pub const TARGET_LANGUAGE_KEY: &str = "lyrics-translator-target-lang";

#[derive(Clone, Debug)]
pub struct Config {
    /// ISO 639-1 code translations are requested in.
    pub target_language: String,
    /// Quiet period after a DOM notification before a pass runs.
    pub debounce_ms: i32,
    /// Timeout for translation and lyrics requests.
    pub server_timeout_ms: i32,
    /// Timeout for the availability probe.
    pub ping_timeout_ms: i32,
    /// Location of the published endpoint descriptor; empty disables
    /// discovery.
    pub descriptor_url: String,
    /// How long a discovered endpoint URL stays fresh.
    pub descriptor_fresh_ms: f64,
    /// Static fallback endpoint; empty means none.
    pub default_endpoint: String,
    /// Per-line cache capacity, oldest entries pruned beyond it.
    pub line_cache_cap: usize,
    /// Per-track cache capacity.
    pub track_cache_cap: usize,
    /// Per-track cache entry lifetime.
    pub track_cache_ttl_ms: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: "es".to_string(),
            debounce_ms: 500,
            server_timeout_ms: 5_000,
            ping_timeout_ms: 2_000,
            descriptor_url:
                "https://raw.githubusercontent.com/Olivernio/beautiful-lyrics-translator/refs/heads/main/tunnel-url.txt"
                    .to_string(),
            descriptor_fresh_ms: 5.0 * 60.0 * 1000.0,
            default_endpoint: String::new(),
            line_cache_cap: 500,
            track_cache_cap: 50,
            track_cache_ttl_ms: 60.0 * 60.0 * 1000.0,
        }
    }
}
