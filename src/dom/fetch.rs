//! Timeout-bounded HTTP
//!
//! Thin wrapper over the page's `fetch` with an `AbortController`-based
//! timeout. Non-2xx, abort, and malformed bodies all surface as
//! `OverlayError` variants that callers degrade to "no translation".

use serde::de::DeserializeOwned;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Request, RequestCache, RequestInit, Response, Window};

use crate::dom::js_error_string;
use crate::errors::OverlayError;

fn network_err(value: JsValue) -> OverlayError {
    OverlayError::NetworkFailure(js_error_string(&value))
}

fn window() -> Result<Window, OverlayError> {
    web_sys::window().ok_or_else(|| OverlayError::NetworkFailure("no window".to_string()))
}

/// Fetch a URL as text, aborting after `timeout_ms`.
///
/// `no_store` bypasses the HTTP cache; used for the endpoint descriptor,
/// which must always reflect the currently published URL.
pub async fn fetch_text(url: &str, timeout_ms: i32, no_store: bool) -> Result<String, OverlayError> {
    let window = window()?;

    let controller = AbortController::new().map_err(network_err)?;
    let init = RequestInit::new();
    init.set_signal(Some(&controller.signal()));
    if no_store {
        init.set_cache(RequestCache::NoStore);
    }
    let request = Request::new_with_str_and_init(url, &init).map_err(network_err)?;

    // The closure outlives the await so a firing timer can still abort;
    // it is cleared before the closure drops, so it can never fire late.
    let abort = Closure::once(move || controller.abort());
    let timeout_id = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            abort.as_ref().unchecked_ref(),
            timeout_ms,
        )
        .map_err(network_err)?;

    let response = JsFuture::from(window.fetch_with_request(&request)).await;
    window.clear_timeout_with_handle(timeout_id);
    drop(abort);

    let response: Response = response
        .map_err(network_err)?
        .dyn_into()
        .map_err(network_err)?;
    if !response.ok() {
        return Err(OverlayError::NetworkFailure(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }

    let body = JsFuture::from(response.text().map_err(network_err)?)
        .await
        .map_err(network_err)?;
    body.as_string()
        .ok_or_else(|| OverlayError::InvalidRemoteData("response body is not text".to_string()))
}

/// Fetch a URL and decode its JSON body.
pub async fn fetch_json<T: DeserializeOwned>(url: &str, timeout_ms: i32) -> Result<T, OverlayError> {
    let body = fetch_text(url, timeout_ms, false).await?;
    serde_json::from_str(&body).map_err(|e| OverlayError::InvalidRemoteData(e.to_string()))
}

/// Whether the endpoint answers its availability probe with a 2xx.
pub async fn probe(url: &str, timeout_ms: i32) -> bool {
    fetch_text(url, timeout_ms, false).await.is_ok()
}
