//! Lyrics tree snapshotting
//!
//! Locates the host's lyrics container and materializes each visual group
//! into an owned `HostNode<Element>` tree. Extraction then runs on stable
//! data; the element handles stay valid until the next mutation, which is
//! exactly as long as the reconciler needs them.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::models::HostNode;

/// Selector matching one visual stanza/group of vocals.
const GROUP_SELECTOR: &str = ".VocalsGroup, [class*=\"VocalsGroup\"]";

/// Selector for the host's scrollable lyrics wrapper.
pub const SCROLLER_SELECTOR: &str = ".simplebar-content-wrapper";

/// The parent element containing all vocal groups, if rendered.
pub fn lyrics_root(document: &Document) -> Option<Element> {
    document
        .query_selector(GROUP_SELECTOR)
        .ok()
        .flatten()
        .and_then(|group| group.parent_element())
}

/// All vocal groups under the root, in document order.
pub fn group_elements(root: &Element) -> Vec<Element> {
    let mut groups = Vec::new();
    if let Ok(list) = root.query_selector_all(GROUP_SELECTOR) {
        for i in 0..list.length() {
            if let Some(node) = list.item(i) {
                if let Ok(element) = node.dyn_into::<Element>() {
                    groups.push(element);
                }
            }
        }
    }
    groups
}

/// Recursively snapshot one element subtree.
pub fn snapshot_element(element: &Element) -> HostNode<Element> {
    let mut node = HostNode::new(
        element.clone(),
        element.class_name(),
        element.text_content().unwrap_or_default().trim().to_string(),
    );
    let children = element.children();
    for i in 0..children.length() {
        if let Some(child) = children.item(i) {
            node.children.push(snapshot_element(&child));
        }
    }
    node
}

/// Snapshot every vocal group currently rendered.
///
/// `None` when the lyrics container is absent (host UI not ready).
pub fn snapshot_groups(document: &Document) -> Option<Vec<HostNode<Element>>> {
    let root = lyrics_root(document)?;
    let groups = group_elements(&root);
    if groups.is_empty() {
        return None;
    }
    Some(groups.iter().map(snapshot_element).collect())
}
