//! Overlay DOM writes
//!
//! One overlay element per vocal block, inserted immediately after the
//! block's element. The overlay carries its source text in a
//! `data-source-text` attribute as a stable identity key, so completed
//! translations and later passes re-associate with it without relying on
//! positional indices. Visual styling is left entirely to CSS; this module
//! only toggles state classes.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::dom::js_error_string;
use crate::dom::snapshot::SCROLLER_SELECTOR;
use crate::models::VocalBlock;

/// Class marking our injected overlay elements.
pub const OVERLAY_CLASS: &str = "translated-overlay";

/// Attribute holding the overlay's stable identity key.
pub const SOURCE_ATTR: &str = "data-source-text";

const ACTIVE_CLASS: &str = "active";
const LAST_CLASS: &str = "last";

/// Selector for the currently highlighted vocal block.
const ACTIVE_BLOCK_SELECTOR: &str = ".VocalsGroup > .Vocals.Active, \
     .VocalsGroup > .Vocals.Lead.Active, \
     .VocalsGroup > .Vocals.Background.Active, \
     .VocalsGroup > .Vocals.Highlight";

/// Pixel deadband below which scroll offsets are ignored to avoid jitter.
const SCROLL_DEADBAND_PX: f64 = 5.0;

fn has_token(classes: &str, token: &str) -> bool {
    classes.split_whitespace().any(|c| c == token)
}

fn is_overlay(element: &Element) -> bool {
    has_token(&element.class_name(), OVERLAY_CLASS)
}

/// Whether a block element is currently host-highlighted.
///
/// The host marks activity on the block itself, on a descendant, or on an
/// ancestor, depending on its render mode; all three are checked.
pub fn is_block_active(element: &Element) -> bool {
    let active_classes =
        |classes: &str| has_token(classes, "Active") || has_token(classes, "Highlight");
    if active_classes(&element.class_name()) {
        return true;
    }
    if let Ok(Some(_)) = element.query_selector(".Active, .Highlight") {
        return true;
    }
    let mut ancestor = element.parent_element();
    while let Some(el) = ancestor {
        if el.tag_name().eq_ignore_ascii_case("body") {
            break;
        }
        if active_classes(&el.class_name()) {
            return true;
        }
        ancestor = el.parent_element();
    }
    false
}

/// Full class string for an overlay in the given state.
///
/// Deterministic for a given state, so repeated refreshes compare equal
/// against the element's current value.
fn state_classes(active: bool, is_last: bool) -> String {
    let mut classes = OVERLAY_CLASS.to_string();
    if active {
        classes.push(' ');
        classes.push_str(ACTIVE_CLASS);
    }
    if is_last {
        classes.push(' ');
        classes.push_str(LAST_CLASS);
    }
    classes
}

fn apply_state(overlay: &Element, active: bool, is_last: bool) {
    let next = state_classes(active, is_last);
    // An identical write still queues a class mutation record, and the
    // structural observer filters on class; writing unconditionally would
    // schedule a pass from every pass, forever.
    if overlay.class_name() != next {
        overlay.set_class_name(&next);
    }
}

/// Insert or update-in-place the overlay for one block.
///
/// When the immediately following element is already one of our overlays
/// it is reused (identity key, text, and state rewritten); otherwise a new
/// element is created and inserted directly after the block. This keeps
/// the invariant of at most one overlay per block across passes.
pub fn upsert_after(
    document: &Document,
    block: &VocalBlock<Element>,
    translation: Option<&str>,
    active: bool,
) -> Result<(), JsValue> {
    let element = &block.handle;
    if let Some(next) = element.next_element_sibling() {
        if is_overlay(&next) {
            if next.get_attribute(SOURCE_ATTR).as_deref() != Some(block.text.as_str()) {
                next.set_attribute(SOURCE_ATTR, &block.text)?;
            }
            let text = translation.unwrap_or("");
            if next.text_content().as_deref() != Some(text) {
                next.set_text_content(Some(text));
            }
            apply_state(&next, active, block.is_last);
            return Ok(());
        }
    }

    let overlay = document.create_element("div")?;
    overlay.set_attribute(SOURCE_ATTR, &block.text)?;
    overlay.set_text_content(Some(translation.unwrap_or("")));
    apply_state(&overlay, active, block.is_last);

    if let Some(parent) = element.parent_element() {
        parent.insert_before(&overlay, element.next_sibling().as_ref())?;
    }
    Ok(())
}

/// Patch the text of the overlay whose identity key matches `source_text`.
///
/// Searched across the whole document rather than by position, since the
/// host may have reshuffled siblings since the request was issued. Returns
/// false when no such overlay exists (stale completion).
pub fn patch_text(document: &Document, source_text: &str, translation: &str) -> bool {
    let Ok(list) = document.query_selector_all(&format!(".{OVERLAY_CLASS}")) else {
        return false;
    };
    for i in 0..list.length() {
        let Some(node) = list.item(i) else { continue };
        let Ok(element) = node.dyn_into::<Element>() else {
            continue;
        };
        if element.get_attribute(SOURCE_ATTR).as_deref() == Some(source_text) {
            element.set_text_content(Some(translation));
            return true;
        }
    }
    false
}

/// Re-derive the active/inactive state of every overlay from its source
/// block (the preceding element sibling).
pub fn refresh_states(document: &Document) {
    let Ok(list) = document.query_selector_all(&format!(".{OVERLAY_CLASS}")) else {
        return;
    };
    for i in 0..list.length() {
        let Some(node) = list.item(i) else { continue };
        let Ok(overlay) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(block) = overlay.previous_element_sibling() else {
            continue;
        };
        let is_last = has_token(&overlay.class_name(), LAST_CLASS);
        apply_state(&overlay, is_block_active(&block), is_last);
    }
}

/// Overlay element following the active block, checked first among its
/// siblings and then after its group.
fn following_overlay(active: &Element, group: &Element) -> Option<Element> {
    let mut next = active.next_element_sibling();
    while let Some(el) = next {
        if is_overlay(&el) {
            return Some(el);
        }
        next = el.next_element_sibling();
    }
    let mut next = group.next_element_sibling();
    while let Some(el) = next {
        if is_overlay(&el) {
            return Some(el);
        }
        next = el.next_element_sibling();
    }
    None
}

/// Center the active block plus its overlay inside the lyrics scroller.
///
/// No-op when there is no scroller or no active line; offsets inside the
/// deadband are ignored so the adjustment never fights the host's own
/// animation over sub-pixel differences.
pub fn adjust_scroll(document: &Document) {
    let Ok(Some(scroller)) = document.query_selector(SCROLLER_SELECTOR) else {
        return;
    };
    let Ok(Some(active)) = document.query_selector(ACTIVE_BLOCK_SELECTOR) else {
        return;
    };
    let Ok(Some(group)) = active.closest(".VocalsGroup") else {
        return;
    };

    let active_rect = active.get_bounding_client_rect();
    let scroller_rect = scroller.get_bounding_client_rect();

    let mut block_bottom = active_rect.bottom();
    if let Some(overlay) = following_overlay(&active, &group) {
        block_bottom = block_bottom.max(overlay.get_bounding_client_rect().bottom());
    }

    let total_height = block_bottom - active_rect.top();
    let block_center = active_rect.top() + total_height / 2.0;
    let scroller_center = scroller_rect.top() + scroller_rect.height() / 2.0;
    let offset = block_center - scroller_center;

    if offset.abs() > SCROLL_DEADBAND_PX {
        scroller.set_scroll_top(scroller.scroll_top() + offset as i32);
    }
}

/// Queue a scroll adjustment after two chained animation frames.
///
/// The host runs its own scroll animation on highlight changes; waiting
/// two frame boundaries lets it settle before we measure. The shared flag
/// coalesces overlapping requests.
pub fn schedule_scroll_adjustment(scheduled: &Rc<Cell<bool>>) {
    if scheduled.get() {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    scheduled.set(true);

    let flag = scheduled.clone();
    let outer = Closure::once_into_js(move || {
        let inner_flag = flag.clone();
        let Some(window) = web_sys::window() else {
            flag.set(false);
            return;
        };
        let inner = Closure::once_into_js(move || {
            inner_flag.set(false);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                adjust_scroll(&document);
            }
        });
        if let Err(e) = window.request_animation_frame(inner.unchecked_ref()) {
            flag.set(false);
            log::warn!("requestAnimationFrame failed: {}", js_error_string(&e));
        }
    });
    if let Err(e) = window.request_animation_frame(outer.unchecked_ref()) {
        scheduled.set(false);
        log::warn!("requestAnimationFrame failed: {}", js_error_string(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_classes_are_stable_across_refreshes() {
        // apply_state skips the DOM write when the class string is
        // unchanged; that only holds if recomputing the same state yields
        // an identical string every time
        for (active, is_last) in [(false, false), (true, false), (false, true), (true, true)] {
            assert_eq!(
                state_classes(active, is_last),
                state_classes(active, is_last),
                "same state must render the same class string"
            );
        }
    }

    #[test]
    fn state_classes_toggle_exactly_the_state_tokens() {
        assert_eq!(state_classes(false, false), OVERLAY_CLASS);
        assert_eq!(state_classes(true, false), format!("{OVERLAY_CLASS} {ACTIVE_CLASS}"));
        assert_eq!(state_classes(false, true), format!("{OVERLAY_CLASS} {LAST_CLASS}"));
        assert_eq!(
            state_classes(true, true),
            format!("{OVERLAY_CLASS} {ACTIVE_CLASS} {LAST_CLASS}")
        );
    }
}
