//! Remote protocol
//!
//! Wire types and URL construction for the translation backend, plus
//! validation of the endpoint descriptor body. The actual transport lives
//! in `dom::fetch`; everything here is pure and natively testable.

use serde::{Deserialize, Serialize};

use crate::errors::OverlayError;

/// Response body of `GET /translate`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translation: Option<String>,
}

/// Build the per-line translation request URL.
pub fn translate_url(base: &str, text: &str, lang: &str) -> String {
    format!(
        "{}/translate?text={}&lang={}",
        base.trim_end_matches('/'),
        urlencoding::encode(text),
        urlencoding::encode(lang),
    )
}

/// Build the whole-track lyrics request URL.
pub fn lyrics_url(base: &str, artist: &str, title: &str, lang: &str) -> String {
    format!(
        "{}/lyrics?artist={}&title={}&lang={}",
        base.trim_end_matches('/'),
        urlencoding::encode(artist),
        urlencoding::encode(title),
        urlencoding::encode(lang),
    )
}

/// Build the availability probe URL.
pub fn ping_url(base: &str) -> String {
    format!("{}/ping", base.trim_end_matches('/'))
}

/// Validate an endpoint descriptor body.
///
/// The descriptor is plain text whose sole content is one absolute
/// `http(s)://` URL; anything else is treated as a fetch failure.
pub fn parse_descriptor(body: &str) -> Result<String, OverlayError> {
    let url = body.trim();
    if url.is_empty() {
        return Err(OverlayError::InvalidRemoteData(
            "empty endpoint descriptor".to_string(),
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(OverlayError::InvalidRemoteData(format!(
            "descriptor is not an absolute http(s) URL: {url}"
        )));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_url_encodes_query_text() {
        let url = translate_url("https://host.example", "I want you", "es");
        assert_eq!(
            url,
            "https://host.example/translate?text=I%20want%20you&lang=es"
        );
    }

    #[test]
    fn descriptor_rejects_non_http_body() {
        assert!(parse_descriptor("ftp://nope").is_err());
        assert!(parse_descriptor("   ").is_err());
        assert_eq!(
            parse_descriptor("  https://tunnel.example \n").unwrap(),
            "https://tunnel.example"
        );
    }
}
