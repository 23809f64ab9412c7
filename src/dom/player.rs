//! Host player state
//!
//! Reads the current track identity from the host player's global object,
//! walking it reflectively so a missing or reshaped global degrades to
//! `None` instead of throwing. Falls back to scraping the now-playing DOM
//! when the global is unavailable. Also wires the host's song-change and
//! navigation events into a caller-supplied callback.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

use crate::models::TrackIdentity;

fn get_path(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut current = root.clone();
    for segment in path {
        if current.is_undefined() || current.is_null() {
            return None;
        }
        current = Reflect::get(&current, &JsValue::from_str(segment)).ok()?;
    }
    if current.is_undefined() || current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn string_at(root: &JsValue, path: &[&str]) -> Option<String> {
    get_path(root, path).and_then(|v| v.as_string())
}

/// Joined artist names from the player's `track.artists` array, falling
/// back to the single `artist.name` field.
fn artist_of(track: &JsValue) -> Option<String> {
    if let Some(artists) = get_path(track, &["artists"]) {
        if Array::is_array(&artists) {
            let names: Vec<String> = Array::from(&artists)
                .iter()
                .filter_map(|a| string_at(&a, &["name"]))
                .collect();
            if !names.is_empty() {
                return Some(names.join(", "));
            }
        }
    }
    string_at(track, &["artist", "name"])
}

fn track_from_player() -> Option<TrackIdentity> {
    let window: JsValue = web_sys::window()?.into();
    let track = get_path(&window, &["Spicetify", "Player", "data", "track"])
        .or_else(|| get_path(&window, &["Spicetify", "Platform", "Player", "data", "track"]))?;

    let title = string_at(&track, &["name"])
        .or_else(|| string_at(&track, &["title"]))
        .unwrap_or_default();
    let artist = artist_of(&track).unwrap_or_default();
    let uri = string_at(&track, &["uri"]).unwrap_or_default();
    Some(TrackIdentity::new(artist, title, uri))
}

fn track_from_dom(document: &Document) -> Option<TrackIdentity> {
    let title = document
        .query_selector("[data-testid=\"entityTitle\"]")
        .ok()
        .flatten()?;
    let artist = document
        .query_selector(
            "[data-testid=\"context-item-info-artist\"] a, [data-testid=\"context-item-info-artist\"]",
        )
        .ok()
        .flatten()?;
    Some(TrackIdentity::new(
        artist.text_content().unwrap_or_default().trim().to_string(),
        title.text_content().unwrap_or_default().trim().to_string(),
        "",
    ))
}

/// Current track identity, if the host exposes one.
pub fn current_track(document: &Document) -> Option<TrackIdentity> {
    track_from_player().or_else(|| track_from_dom(document))
}

/// Subscribe `callback` to the host's song-change events.
///
/// Tries both player global shapes the host is known to use. Failures are
/// silent; the mutation observer still catches every change, just later.
fn hook_player_events(window: &JsValue, path: &[&str], callback: &Function) {
    let Some(player) = get_path(window, path) else {
        return;
    };
    let Some(add_listener) = get_path(&player, &["addEventListener"]) else {
        return;
    };
    let Ok(add_listener) = add_listener.dyn_into::<Function>() else {
        return;
    };
    for event in ["songchange", "queue_change"] {
        let _ = add_listener.call2(&player, &JsValue::from_str(event), callback);
    }
}

/// Hook navigation and song-change events into the given callback.
pub fn hook_navigation(callback: &Function) {
    let Some(window) = web_sys::window() else {
        return;
    };
    for event in ["popstate", "hashchange"] {
        if let Err(e) = window.add_event_listener_with_callback(event, callback) {
            log::warn!("failed to hook {event}: {e:?}");
        }
    }
    let window: JsValue = window.into();
    hook_player_events(&window, &["Spicetify", "Platform", "Player"], callback);
    hook_player_events(&window, &["Spicetify", "Player"], callback);
}
