//! Endpoint location cache
//!
//! The translation backend lives behind a tunnel whose URL changes; its
//! current location is published in a remotely hosted plain-text
//! descriptor. This tier caches the discovered URL for five minutes and
//! resolves "the active endpoint" with a fixed precedence: a manually
//! configured override always wins, then a fresh discovered URL, then a
//! static default if one is configured, then nothing. With nothing
//! resolved the network features degrade to no-ops.

use serde::{Deserialize, Serialize};

use crate::cache::store::KeyValueStore;

const OVERRIDE_KEY: &str = "lyrics-translator-server-url";
const DISCOVERED_URL_KEY: &str = "lyrics-translator-remote-url";
const DISCOVERED_AT_KEY: &str = "lyrics-translator-remote-url-fetched-at";

/// Where a resolved endpoint URL came from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointSource {
    Manual,
    RemoteDiscovered,
    Default,
    None,
}

/// Resolution result reported to the control surface.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResolvedEndpoint {
    pub url: Option<String>,
    pub source: EndpointSource,
}

/// Endpoint location store with manual-override precedence.
#[derive(Clone)]
pub struct EndpointCache<S: KeyValueStore> {
    store: S,
    fresh_ms: f64,
    default_endpoint: Option<String>,
}

impl<S: KeyValueStore> EndpointCache<S> {
    pub fn new(store: S, fresh_ms: f64, default_endpoint: Option<String>) -> Self {
        Self {
            store,
            fresh_ms,
            default_endpoint: default_endpoint.filter(|u| !u.is_empty()),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("endpoint cache read failed for {key}: {e}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("endpoint cache write dropped for {key}: {e}");
        }
    }

    /// The manually configured override, if set.
    pub fn manual_override(&self) -> Option<String> {
        self.read(OVERRIDE_KEY)
    }

    /// Set or replace the manual override.
    pub fn set_override(&self, url: &str) {
        self.write(OVERRIDE_KEY, url);
    }

    /// Remove the manual override, falling back to discovery.
    pub fn clear_override(&self) {
        if let Err(e) = self.store.remove(OVERRIDE_KEY) {
            log::warn!("failed to clear endpoint override: {e}");
        }
    }

    /// The discovered URL, if it is still within the freshness window.
    pub fn fresh_discovered(&self, now_ms: f64) -> Option<String> {
        let url = self.read(DISCOVERED_URL_KEY)?;
        let fetched_at: f64 = self.read(DISCOVERED_AT_KEY)?.parse().ok()?;
        if now_ms - fetched_at < self.fresh_ms {
            Some(url)
        } else {
            None
        }
    }

    /// Record a freshly discovered URL.
    pub fn store_discovered(&self, url: &str, now_ms: f64) {
        self.write(DISCOVERED_URL_KEY, url);
        self.write(DISCOVERED_AT_KEY, &format!("{now_ms}"));
    }

    /// Drop the discovered entry entirely.
    pub fn clear_discovered(&self) {
        if let Err(e) = self
            .store
            .remove(DISCOVERED_URL_KEY)
            .and_then(|_| self.store.remove(DISCOVERED_AT_KEY))
        {
            log::warn!("failed to clear discovered endpoint: {e}");
        }
    }

    /// Resolve the active endpoint with override > discovered > default.
    pub fn resolve(&self, now_ms: f64) -> ResolvedEndpoint {
        if let Some(url) = self.manual_override() {
            return ResolvedEndpoint {
                url: Some(url),
                source: EndpointSource::Manual,
            };
        }
        if let Some(url) = self.fresh_discovered(now_ms) {
            return ResolvedEndpoint {
                url: Some(url),
                source: EndpointSource::RemoteDiscovered,
            };
        }
        if let Some(url) = self.default_endpoint.clone() {
            return ResolvedEndpoint {
                url: Some(url),
                source: EndpointSource::Default,
            };
        }
        ResolvedEndpoint {
            url: None,
            source: EndpointSource::None,
        }
    }
}
