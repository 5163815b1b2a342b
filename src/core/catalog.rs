//! Catalog loading.
//!
//! The catalog is fetched exactly once per session from `{base}/summary.json`.
//! A failed load is terminal: the state moves to [`CatalogState::Failed`]
//! and the grid stays empty.

use crate::config::MIN_BOOK_SIZE_BYTES;
use crate::core::error::FetchError;
use crate::models::{Book, Summary};
use crate::utils::url::summary_url;

/// Source of the catalog document.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn fetch_summary(&self, url: &str) -> Result<Summary, FetchError>;
}

/// Catalog fetched over HTTP with the browser Fetch API.
pub struct HttpCatalogSource;

impl CatalogSource for HttpCatalogSource {
    async fn fetch_summary(&self, url: &str) -> Result<Summary, FetchError> {
        crate::utils::fetch_json(url).await
    }
}

/// Load lifecycle of the catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready(Vec<Book>),
    Failed(String),
}

impl CatalogState {
    /// Books in the catalog; empty unless loaded.
    pub fn books(&self) -> &[Book] {
        match self {
            Self::Ready(books) => books,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Fetch the catalog from `base` and apply the data-quality filter.
pub async fn load(source: &impl CatalogSource, base: &str) -> CatalogState {
    let url = summary_url(base);
    tracing::debug!(%url, "loading catalog");

    match source.fetch_summary(&url).await {
        Ok(summary) => {
            let total = summary.book.len();
            let books = retain_valid(summary.book);
            tracing::info!(total, kept = books.len(), "catalog loaded");
            CatalogState::Ready(books)
        }
        Err(e) => {
            tracing::error!(error = %e, %url, "catalog load failed");
            CatalogState::Failed(e.to_string())
        }
    }
}

/// Drop entries whose declared size is too small to be a real book.
///
/// Entries without `size_in_bytes` are kept.
pub fn retain_valid(books: Vec<Book>) -> Vec<Book> {
    books
        .into_iter()
        .filter(|book| book.size_in_bytes.is_none_or(|size| size >= MIN_BOOK_SIZE_BYTES))
        .collect()
}
