//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use web_sys::{Blob, BlobPropertyBag, History, Storage, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get localStorage.
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// Get the session history object.
#[inline]
pub fn history() -> Option<History> {
    window()?.history().ok()
}

/// Show a blocking alert dialog.
pub fn alert(message: &str) {
    if let Some(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

/// Open `url` in a new browsing context.
///
/// Returns `false` if the browser refused (e.g. popup blocked).
pub fn open_in_new_tab(url: &str) -> bool {
    window()
        .and_then(|w| w.open_with_url_and_target(url, "_blank").ok())
        .flatten()
        .is_some()
}

/// Wrap raw bytes in a `Blob` of the given MIME type.
pub fn blob_from_bytes(bytes: &[u8], mime: &str) -> Option<Blob> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options).ok()
}

// =============================================================================
// Browser Navigation
// =============================================================================

/// Get the current URL hash (with the '#' prefix, if any).
pub fn get_hash() -> String {
    window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Current path and query string, without the fragment.
///
/// Used as the URL for history updates that clear the hash.
pub fn path_without_hash() -> String {
    let Some(location) = window().map(|w| w.location()) else {
        return String::new();
    };
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
}
