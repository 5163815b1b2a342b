//! Saving a book's EPUB to disk.
//!
//! The preferred path fetches the document as a blob and clicks a temporary
//! `<a download>`, which names the file. When that fails (CORS, network,
//! blocked object URLs) the document URL is opened in a new tab instead.

use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::core::error::FetchError;
use crate::models::Book;
use crate::utils::dom;
use crate::utils::url::epub_url;

/// Where a book is fetched from and what it is saved as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub filename: String,
}

impl DownloadTarget {
    pub fn for_book(book: &Book, base: &str) -> Self {
        Self {
            url: epub_url(base, &book.author, &book.name),
            filename: format!("{}.epub", book.name),
        }
    }
}

/// Delay before a download's object URL is revoked.
///
/// Revoking right after the click can abort the save in some browsers.
const REVOKE_DELAY_MS: u32 = 10_000;

/// How a download completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved,
    OpenedInNewTab,
    Failed,
}

/// Download `book`, falling back to opening its URL directly.
pub async fn download(book: &Book, base: &str) -> DownloadOutcome {
    let target = DownloadTarget::for_book(book, base);

    match save_via_blob(&target).await {
        Ok(()) => {
            tracing::info!(file = %target.filename, "download saved");
            DownloadOutcome::Saved
        }
        Err(e) => {
            tracing::warn!(error = %e, url = %target.url, "blob download failed; opening directly");
            if dom::open_in_new_tab(&target.url) {
                DownloadOutcome::OpenedInNewTab
            } else {
                DownloadOutcome::Failed
            }
        }
    }
}

async fn save_via_blob(target: &DownloadTarget) -> Result<(), FetchError> {
    let response = Request::get(&target.url)
        .send()
        .await
        .map_err(|e| FetchError::NetworkError(e.to_string()))?;
    if !response.ok() {
        return Err(FetchError::HttpError(response.status()));
    }

    let bytes = response
        .binary()
        .await
        .map_err(|_| FetchError::ResponseReadFailed)?;
    let blob = dom::blob_from_bytes(&bytes, "application/epub+zip")
        .ok_or(FetchError::InvalidContent)?;
    let object_url =
        web_sys::Url::create_object_url_with_blob(&blob).map_err(|_| FetchError::InvalidContent)?;

    let clicked = click_download_link(&object_url, &target.filename);
    revoke_later(object_url);

    if clicked {
        Ok(())
    } else {
        Err(FetchError::NoWindow)
    }
}

fn revoke_later(object_url: String) {
    spawn_local(async move {
        TimeoutFuture::new(REVOKE_DELAY_MS).await;
        let _ = web_sys::Url::revoke_object_url(&object_url);
    });
}

fn click_download_link(href: &str, filename: &str) -> bool {
    let Some(document) = dom::window().and_then(|w| w.document()) else {
        return false;
    };
    let Some(anchor) = document
        .create_element("a")
        .ok()
        .and_then(|el| el.dyn_into::<web_sys::HtmlAnchorElement>().ok())
    else {
        return false;
    };

    anchor.set_href(href);
    anchor.set_download(filename);
    let Some(body) = document.body() else {
        return false;
    };
    if body.append_child(&anchor).is_err() {
        return false;
    }
    anchor.click();
    anchor.remove();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_target() {
        let book = Book {
            author: "Mary Shelley".to_string(),
            name: "Frankenstein; or, The Modern Prometheus".to_string(),
            ..Default::default()
        };
        let target = DownloadTarget::for_book(&book, "https://host/data");
        assert_eq!(
            target.url,
            "https://host/data/author/Mary%20Shelley/Frankenstein%3B%20or%2C%20The%20Modern%20Prometheus.epub"
        );
        assert_eq!(target.filename, "Frankenstein; or, The Modern Prometheus.epub");
    }

    #[test]
    fn test_revoke_waits_for_the_save_to_start() {
        assert!(REVOKE_DELAY_MS >= 1_000);
    }
}
