// Test the three cache tiers and their degradation behavior

use translator_wasm::cache::{
    EndpointCache, EndpointSource, KeyValueStore, LineCache, MemoryStore, TrackCache, TrackLyrics,
};
use translator_wasm::OverlayError;

const FIVE_MIN: f64 = 5.0 * 60.0 * 1000.0;
const ONE_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Store whose every operation fails, for the degradation path
#[derive(Clone)]
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, OverlayError> {
        Err(OverlayError::StorageFailure("quota exceeded".to_string()))
    }
    fn set(&self, _key: &str, _value: &str) -> Result<(), OverlayError> {
        Err(OverlayError::StorageFailure("quota exceeded".to_string()))
    }
    fn remove(&self, _key: &str) -> Result<(), OverlayError> {
        Err(OverlayError::StorageFailure("quota exceeded".to_string()))
    }
}

#[test]
fn test_line_cache_round_trip() {
    let cache = LineCache::new(MemoryStore::new(), 500);
    cache.insert("I want you to stay", "es", "Quiero que te quedes");
    assert_eq!(
        cache.get("I want you to stay", "es").as_deref(),
        Some("Quiero que te quedes")
    );
    assert_eq!(cache.get("I want you to stay", "fr"), None, "language is part of the key");
}

#[test]
fn test_line_cache_key_is_normalized() {
    let cache = LineCache::new(MemoryStore::new(), 500);
    cache.insert("Hello, World!", "es", "Hola Mundo");
    assert_eq!(
        cache.get("hello world", "es").as_deref(),
        Some("Hola Mundo"),
        "punctuation and case differences hit the same entry"
    );
}

#[test]
fn test_line_cache_overwrites_and_prunes_oldest() {
    let cache = LineCache::new(MemoryStore::new(), 2);
    cache.insert("one", "es", "uno");
    cache.insert("two", "es", "dos");
    cache.insert("one", "es", "UNO");
    assert_eq!(cache.get("one", "es").as_deref(), Some("UNO"), "re-translation overwrites");

    cache.insert("three", "es", "tres");
    assert_eq!(cache.get("two", "es"), None, "oldest entry pruned beyond capacity");
    assert_eq!(cache.get("one", "es").as_deref(), Some("UNO"));
    assert_eq!(cache.get("three", "es").as_deref(), Some("tres"));
}

#[test]
fn test_track_cache_round_trip_and_ttl() {
    let cache = TrackCache::new(MemoryStore::new(), 50, ONE_HOUR);
    let pair = TrackLyrics {
        lyrics: "I want you to stay".to_string(),
        translation: "Quiero que te quedes".to_string(),
    };
    cache.insert("Rihanna", "Stay", "es", pair.clone(), 0.0);

    assert_eq!(cache.get("Rihanna", "Stay", "es", 1000.0), Some(pair));
    assert_eq!(
        cache.get("Rihanna", "Stay", "es", ONE_HOUR + 1.0),
        None,
        "entry is absent after the TTL elapses"
    );
}

#[test]
fn test_track_cache_evicts_oldest_track() {
    let cache = TrackCache::new(MemoryStore::new(), 2, ONE_HOUR);
    let pair = TrackLyrics::default();
    cache.insert("A", "first", "es", pair.clone(), 0.0);
    cache.insert("B", "second", "es", pair.clone(), 1.0);
    cache.insert("C", "third", "es", pair, 2.0);

    assert!(cache.get("A", "first", "es", 3.0).is_none(), "oldest track evicted");
    assert!(cache.get("B", "second", "es", 3.0).is_some());
    assert!(cache.get("C", "third", "es", 3.0).is_some());
}

#[test]
fn test_storage_failure_degrades_to_miss() {
    let cache = LineCache::new(BrokenStore, 500);
    cache.insert("hello", "es", "hola");
    assert_eq!(cache.get("hello", "es"), None, "broken storage reads as a miss");
}

#[test]
fn test_endpoint_manual_override_wins_over_fresh_discovery() {
    let cache = EndpointCache::new(MemoryStore::new(), FIVE_MIN, None);
    cache.store_discovered("https://tunnel.example", 0.0);
    cache.set_override("https://manual.example");

    let resolved = cache.resolve(1000.0);
    assert_eq!(resolved.url.as_deref(), Some("https://manual.example"));
    assert_eq!(resolved.source, EndpointSource::Manual);
}

#[test]
fn test_endpoint_discovery_expires_after_freshness_window() {
    let cache = EndpointCache::new(MemoryStore::new(), FIVE_MIN, None);
    cache.store_discovered("https://tunnel.example", 0.0);

    let fresh = cache.resolve(FIVE_MIN - 1.0);
    assert_eq!(fresh.source, EndpointSource::RemoteDiscovered);
    assert_eq!(fresh.url.as_deref(), Some("https://tunnel.example"));

    let stale = cache.resolve(FIVE_MIN + 1.0);
    assert_eq!(stale.source, EndpointSource::None);
    assert!(stale.url.is_none());
}

#[test]
fn test_endpoint_falls_back_to_default_then_none() {
    let with_default = EndpointCache::new(
        MemoryStore::new(),
        FIVE_MIN,
        Some("https://fallback.example".to_string()),
    );
    let resolved = with_default.resolve(0.0);
    assert_eq!(resolved.source, EndpointSource::Default);
    assert_eq!(resolved.url.as_deref(), Some("https://fallback.example"));

    let without_default = EndpointCache::new(MemoryStore::new(), FIVE_MIN, None);
    assert_eq!(without_default.resolve(0.0).source, EndpointSource::None);
}

#[test]
fn test_clearing_override_restores_discovery() {
    let cache = EndpointCache::new(MemoryStore::new(), FIVE_MIN, None);
    cache.store_discovered("https://tunnel.example", 0.0);
    cache.set_override("https://manual.example");
    cache.clear_override();

    let resolved = cache.resolve(1000.0);
    assert_eq!(resolved.source, EndpointSource::RemoteDiscovered);
    assert_eq!(resolved.url.as_deref(), Some("https://tunnel.example"));
}
