//! Reconciliation driver
//!
//! Wires the reconciler to the live page: a stable outer mutation observer
//! on the document body feeds a debounced pass, an inner observer bound to
//! the lyrics root (and re-bound whenever that root changes) catches
//! highlight-only class flips, and completed network requests are applied
//! back through the reconciler's identity-keyed completion calls. All
//! state lives in one thread-local driver instance; nothing here is
//! reachable from more than one thread by construction.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit, MutationRecord};

use crate::cache::{EndpointCache, KeyValueStore, TrackLyrics};
use crate::config::{Config, TARGET_LANGUAGE_KEY};
use crate::dom::storage::LocalStorageStore;
use crate::dom::{fetch, js_error_string, overlay, player, snapshot};
use crate::models::{HostNode, TrackIdentity, VocalBlock};
use crate::net::{self, TranslateResponse};
use crate::sync::{OverlayHost, PassOutcome, Reconciler};

thread_local! {
    static DRIVER: RefCell<Option<Driver>> = RefCell::new(None);
}

struct Driver {
    reconciler: Rc<RefCell<Reconciler<LocalStorageStore>>>,
    scroll_scheduled: Rc<Cell<bool>>,
    debounce_handle: Cell<Option<i32>>,
    // Closures are held for their lifetime; dropping one would detach the
    // JS callback under the corresponding observer or timer.
    pass_callback: Closure<dyn FnMut()>,
    _trigger_callback: Closure<dyn FnMut()>,
    _structural_callback: Closure<dyn FnMut(Array, MutationObserver)>,
    highlight_callback: Closure<dyn FnMut(Array, MutationObserver)>,
    _structural_observer: MutationObserver,
    highlight_observer: Option<MutationObserver>,
    highlight_root: Option<Element>,
}

fn with_driver<R>(f: impl FnOnce(&Driver) -> R) -> Option<R> {
    DRIVER.with(|cell| cell.borrow().as_ref().map(f))
}

fn current_document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// The endpoint cache over persistent storage, with this build's defaults.
pub(crate) fn endpoint_cache() -> EndpointCache<LocalStorageStore> {
    let config = Config::default();
    EndpointCache::new(
        LocalStorageStore::new(),
        config.descriptor_fresh_ms,
        Some(config.default_endpoint),
    )
}

/// Live `OverlayHost` over the real document.
pub struct DomHost {
    document: Document,
    scroll_scheduled: Rc<Cell<bool>>,
}

impl OverlayHost for DomHost {
    type Handle = Element;

    fn lyrics_groups(&mut self) -> Option<Vec<HostNode<Element>>> {
        snapshot::snapshot_groups(&self.document)
    }

    fn current_track(&mut self) -> Option<TrackIdentity> {
        player::current_track(&self.document)
    }

    fn is_block_active(&self, handle: &Element) -> bool {
        overlay::is_block_active(handle)
    }

    fn upsert_overlay(
        &mut self,
        block: &VocalBlock<Element>,
        translation: Option<&str>,
        active: bool,
    ) {
        if let Err(e) = overlay::upsert_after(&self.document, block, translation, active) {
            log::warn!("overlay write failed: {}", js_error_string(&e));
        }
    }

    fn patch_overlay(&mut self, source_text: &str, translation: &str) -> bool {
        overlay::patch_text(&self.document, source_text, translation)
    }

    fn refresh_overlay_states(&mut self) {
        overlay::refresh_states(&self.document);
    }

    fn schedule_scroll_adjustment(&mut self) {
        overlay::schedule_scroll_adjustment(&self.scroll_scheduled);
    }
}

/// Install the driver: observers, navigation hooks, endpoint discovery,
/// and an initial pass. Idempotent; a second call is a no-op.
pub fn install() {
    if DRIVER.with(|cell| cell.borrow().is_some()) {
        return;
    }
    let Some(document) = current_document() else {
        log::warn!("no document; driver not installed");
        return;
    };
    let Some(body) = document.body() else {
        log::warn!("no body yet; driver not installed");
        return;
    };

    let store = LocalStorageStore::new();
    let mut config = Config::default();
    match store.get(TARGET_LANGUAGE_KEY) {
        Ok(Some(lang)) if !lang.is_empty() => config.target_language = lang,
        Ok(_) => {}
        Err(e) => log::warn!("could not read target language: {e}"),
    }
    let reconciler = Rc::new(RefCell::new(Reconciler::new(store, config)));

    let pass_callback = Closure::<dyn FnMut()>::new(run_pass_now);
    let trigger_callback = Closure::<dyn FnMut()>::new(schedule_pass);
    let structural_callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        |_records: Array, _observer: MutationObserver| {
            schedule_pass();
            rebind_highlight_observer();
        },
    );
    let highlight_callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        |records: Array, _observer: MutationObserver| on_highlight_records(records),
    );

    let structural_observer =
        match MutationObserver::new(structural_callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("MutationObserver unavailable: {}", js_error_string(&e));
                return;
            }
        };
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    init.set_attributes(true);
    init.set_attribute_filter(&Array::of1(&JsValue::from_str("class")));
    if let Err(e) = structural_observer.observe_with_options(&body, &init) {
        log::warn!("failed to observe document body: {}", js_error_string(&e));
        return;
    }

    player::hook_navigation(trigger_callback.as_ref().unchecked_ref());

    DRIVER.with(|cell| {
        *cell.borrow_mut() = Some(Driver {
            reconciler,
            scroll_scheduled: Rc::new(Cell::new(false)),
            debounce_handle: Cell::new(None),
            pass_callback,
            _trigger_callback: trigger_callback,
            _structural_callback: structural_callback,
            highlight_callback,
            _structural_observer: structural_observer,
            highlight_observer: None,
            highlight_root: None,
        });
    });

    spawn_local(refresh_descriptor(false));
    schedule_pass();
}

/// Queue a debounced reconciliation pass, coalescing with any pending one.
pub fn schedule_pass() {
    with_driver(|driver| {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(handle) = driver.debounce_handle.take() {
            window.clear_timeout_with_handle(handle);
        }
        let debounce_ms = driver.reconciler.borrow().config().debounce_ms;
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            driver.pass_callback.as_ref().unchecked_ref(),
            debounce_ms,
        ) {
            Ok(handle) => driver.debounce_handle.set(Some(handle)),
            Err(e) => log::warn!("failed to arm debounce timer: {}", js_error_string(&e)),
        }
    });
}

/// Run a pass immediately and dispatch the follow-up network work.
pub fn run_pass_now() {
    let Some((reconciler, scroll_scheduled)) =
        with_driver(|d| (d.reconciler.clone(), d.scroll_scheduled.clone()))
    else {
        return;
    };
    let Some(document) = current_document() else {
        return;
    };
    with_driver(|d| d.debounce_handle.set(None));

    let mut host = DomHost {
        document,
        scroll_scheduled,
    };
    let outcome = reconciler.borrow_mut().run_pass(&mut host, js_sys::Date::now());
    if let PassOutcome::Updated {
        pending_lines,
        track_fetch,
    } = outcome
    {
        if let Some(track) = track_fetch {
            spawn_local(fetch_track(track));
        }
        for text in pending_lines {
            spawn_local(translate_line(text));
        }
    }
    rebind_highlight_observer();
}

/// Re-bind the highlight observer when the lyrics root changes identity.
///
/// The outer structural subscription has a stable lifetime; only this
/// inner, root-scoped subscription moves with the host's re-renders.
fn rebind_highlight_observer() {
    DRIVER.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(driver) = guard.as_mut() else {
            return;
        };
        let Some(document) = current_document() else {
            return;
        };
        let root = snapshot::lyrics_root(&document);
        if root == driver.highlight_root {
            return;
        }
        if let Some(observer) = driver.highlight_observer.take() {
            observer.disconnect();
        }
        driver.highlight_root = root.clone();
        let Some(root) = root else {
            return;
        };

        let observer = match MutationObserver::new(
            driver.highlight_callback.as_ref().unchecked_ref(),
        ) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("highlight observer failed: {}", js_error_string(&e));
                return;
            }
        };
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_subtree(true);
        init.set_attribute_filter(&Array::of1(&JsValue::from_str("class")));
        if let Err(e) = observer.observe_with_options(&root, &init) {
            log::warn!("failed to observe lyrics root: {}", js_error_string(&e));
            return;
        }
        driver.highlight_observer = Some(observer);
    });
}

fn has_token(classes: &str, token: &str) -> bool {
    classes.split_whitespace().any(|c| c == token)
}

/// Highlight-only mutations: refresh overlay state and re-center, without
/// a full scan.
fn on_highlight_records(records: Array) {
    let mut should_adjust = false;
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        if record.type_() != "attributes" || record.attribute_name().as_deref() != Some("class") {
            continue;
        }
        let Some(target) = record.target() else {
            continue;
        };
        let Ok(element) = target.dyn_into::<Element>() else {
            continue;
        };
        let classes = element.class_name();
        let relevant = has_token(&classes, "Vocals")
            || has_token(&classes, "Active")
            || has_token(&classes, "Highlight");
        let now_active = has_token(&classes, "Active") || has_token(&classes, "Highlight");
        if relevant && now_active {
            should_adjust = true;
            break;
        }
    }
    if !should_adjust {
        return;
    }
    if let Some(document) = current_document() {
        overlay::refresh_states(&document);
    }
    with_driver(|driver| overlay::schedule_scroll_adjustment(&driver.scroll_scheduled));
}

/// Fetch the endpoint descriptor and cache the published URL.
///
/// Unless forced, a still-fresh discovered entry short-circuits the fetch.
pub(crate) async fn refresh_descriptor(force: bool) {
    let config = Config::default();
    if config.descriptor_url.is_empty() {
        return;
    }
    let cache = endpoint_cache();
    if !force && cache.fresh_discovered(js_sys::Date::now()).is_some() {
        return;
    }
    match fetch::fetch_text(&config.descriptor_url, config.server_timeout_ms, true).await {
        Ok(body) => match net::parse_descriptor(&body) {
            Ok(url) => {
                log::info!("endpoint discovered: {url}");
                cache.store_discovered(&url, js_sys::Date::now());
            }
            Err(e) => log::warn!("endpoint descriptor rejected: {e}"),
        },
        Err(e) => log::warn!("endpoint descriptor fetch failed: {e}"),
    }
}

fn resolved_base() -> Option<String> {
    let resolved = endpoint_cache().resolve(js_sys::Date::now());
    if resolved.url.is_none() {
        log::warn!("no translation endpoint configured; skipping request");
    }
    resolved.url
}

/// Per-line translation task; patches the overlay by identity on success.
async fn translate_line(text: String) {
    let Some(base) = resolved_base() else {
        return;
    };
    let (lang, timeout_ms) = match with_driver(|d| {
        let r = d.reconciler.borrow();
        (r.target_language().to_string(), r.config().server_timeout_ms)
    }) {
        Some(pair) => pair,
        None => return,
    };

    let url = net::translate_url(&base, &text, &lang);
    match fetch::fetch_json::<TranslateResponse>(&url, timeout_ms).await {
        Ok(TranslateResponse {
            translation: Some(translation),
        }) if !translation.is_empty() => {
            let Some((reconciler, scroll_scheduled)) =
                with_driver(|d| (d.reconciler.clone(), d.scroll_scheduled.clone()))
            else {
                return;
            };
            let Some(document) = current_document() else {
                return;
            };
            let mut host = DomHost {
                document,
                scroll_scheduled,
            };
            reconciler
                .borrow_mut()
                .complete_line_translation(&mut host, &text, &translation);
        }
        Ok(_) => log::debug!("backend returned no translation for {text:?}"),
        Err(e) => log::warn!("line translation failed: {e}"),
    }
}

/// Whole-track fetch task; re-runs a pass so the fresh pair is aligned.
async fn fetch_track(track: TrackIdentity) {
    let Some(base) = resolved_base() else {
        return;
    };
    let (lang, timeout_ms) = match with_driver(|d| {
        let r = d.reconciler.borrow();
        (r.target_language().to_string(), r.config().server_timeout_ms)
    }) {
        Some(pair) => pair,
        None => return,
    };

    let url = net::lyrics_url(&base, &track.artist, &track.title, &lang);
    match fetch::fetch_json::<TrackLyrics>(&url, timeout_ms).await {
        Ok(data) if !data.lyrics.is_empty() || !data.translation.is_empty() => {
            log::debug!("track lyrics fetched for {}", track.title);
            if let Some(reconciler) = with_driver(|d| d.reconciler.clone()) {
                reconciler
                    .borrow_mut()
                    .complete_track_fetch(&track, data, js_sys::Date::now());
            }
            run_pass_now();
        }
        Ok(_) => log::debug!("backend has no lyrics for {}", track.title),
        Err(e) => log::warn!("track lyrics fetch failed: {e}"),
    }
}

/// Mutable access to the live reconciler, for the control surface.
pub(crate) fn with_reconciler<R>(
    f: impl FnOnce(&mut Reconciler<LocalStorageStore>) -> R,
) -> Option<R> {
    with_driver(|d| f(&mut d.reconciler.borrow_mut()))
}
