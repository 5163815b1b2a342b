//! Endpoint construction and URL component encoding.
//!
//! All paths follow the static hosting layout:
//! `{base}/summary.json` and `{base}/author/{author}/{name}.{ext}`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::config::SUMMARY_PATH;

/// Characters escaped by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single URL component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Decode a percent-encoded component, falling back to the raw input on invalid UTF-8.
pub fn decode_component(value: &str) -> String {
    percent_decode_str(value)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// URL of the catalog document.
pub fn summary_url(base: &str) -> String {
    format!("{}/{}", base, SUMMARY_PATH)
}

/// URL of a cover image.
pub fn cover_url(base: &str, author: &str, filename: &str) -> String {
    asset_url(base, author, filename, "jpg")
}

/// URL of an EPUB document.
pub fn epub_url(base: &str, author: &str, filename: &str) -> String {
    asset_url(base, author, filename, "epub")
}

fn asset_url(base: &str, author: &str, filename: &str, ext: &str) -> String {
    format!(
        "{}/author/{}/{}.{}",
        base,
        encode_component(author),
        encode_component(filename),
        ext
    )
}
