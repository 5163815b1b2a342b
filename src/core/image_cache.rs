//! Opportunistic cover image cache.
//!
//! Covers are fetched as blobs and exposed as session-scoped object URLs.
//! A durable flag (`img-cache-{author}|{filename}`) remembers which covers
//! have loaded before; the bytes themselves are never persisted.
//!
//! Concurrent resolves for the same key may both hit the network. The first
//! handle stored wins; a later duplicate is released and never handed out.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::IMAGE_FLAG_PREFIX;
use crate::core::error::FetchError;
use crate::models::Book;
use crate::utils::storage::KeyValueStore;
use crate::utils::url::cover_url;

/// Fetches images and hands out session handles for them.
#[allow(async_fn_in_trait)]
pub trait ImageFetcher {
    /// Download `url` and return a handle usable as an `<img src>`.
    async fn fetch_handle(&self, url: &str) -> Result<String, FetchError>;

    /// Free a handle previously returned by [`ImageFetcher::fetch_handle`].
    fn release(&self, handle: &str);
}

/// Blob fetcher backed by `URL.createObjectURL`.
pub struct BlobImageFetcher;

impl ImageFetcher for BlobImageFetcher {
    async fn fetch_handle(&self, url: &str) -> Result<String, FetchError> {
        let blob = crate::utils::fetch_blob(url).await?;
        web_sys::Url::create_object_url_with_blob(&blob).map_err(|_| FetchError::InvalidContent)
    }

    fn release(&self, handle: &str) {
        let _ = web_sys::Url::revoke_object_url(handle);
    }
}

/// Composite cache key (`author|filename`).
pub fn cache_key(author: &str, filename: &str) -> String {
    format!("{}|{}", author, filename)
}

fn flag_key(key: &str) -> String {
    format!("{}{}", IMAGE_FLAG_PREFIX, key)
}

/// Session cover cache.
pub struct ImageCache<F, S> {
    base: String,
    fetcher: F,
    store: S,
    handles: RefCell<HashMap<String, String>>,
}

impl<F: ImageFetcher, S: KeyValueStore> ImageCache<F, S> {
    pub fn new(base: impl Into<String>, fetcher: F, store: S) -> Self {
        Self {
            base: base.into(),
            fetcher,
            store,
            handles: RefCell::new(HashMap::new()),
        }
    }

    /// In-memory handle for a cover, without touching the network.
    pub fn cached(&self, author: &str, filename: &str) -> Option<String> {
        self.handles
            .borrow()
            .get(&cache_key(author, filename))
            .cloned()
    }

    /// Whether this cover has loaded successfully in any earlier session.
    pub fn was_fetched_before(&self, author: &str, filename: &str) -> bool {
        self.store
            .get_item(&flag_key(&cache_key(author, filename)))
            .is_some()
    }

    /// Direct remote URL, for callers falling back from the cache.
    pub fn remote_url(&self, author: &str, filename: &str) -> String {
        cover_url(&self.base, author, filename)
    }

    /// Resolve a cover to a session handle, fetching it on first use.
    ///
    /// Returns `None` if the fetch fails; the failure is logged only.
    pub async fn resolve(&self, author: &str, filename: &str) -> Option<String> {
        if let Some(handle) = self.cached(author, filename) {
            return Some(handle);
        }

        let key = cache_key(author, filename);
        let url = self.remote_url(author, filename);

        match self.fetcher.fetch_handle(&url).await {
            Ok(handle) => {
                let handle = self.insert(&key, handle);
                if let Err(e) = self.store.set_item(&flag_key(&key), "1") {
                    tracing::debug!(error = %e, %key, "could not record cover flag");
                }
                Some(handle)
            }
            Err(e) => {
                tracing::warn!(error = %e, %url, "cover fetch failed");
                None
            }
        }
    }

    /// Warm the cache for books that declare a cover.
    pub async fn preload(&self, books: &[Book]) {
        for book in books.iter().filter(|b| b.is_cover_img) {
            if self.cached(&book.author, &book.name).is_none() {
                let _ = self.resolve(&book.author, &book.name).await;
            }
        }
    }

    /// Release every in-memory handle. Durable flags are kept.
    pub fn release_all(&self) {
        let handles: Vec<String> = self.handles.borrow_mut().drain().map(|(_, h)| h).collect();
        for handle in &handles {
            self.fetcher.release(handle);
        }
        tracing::debug!(released = handles.len(), "cover cache released");
    }

    /// Store `handle` unless one is already cached, returning the handle in use.
    fn insert(&self, key: &str, handle: String) -> String {
        let existing = self.handles.borrow().get(key).cloned();
        match existing {
            Some(existing) => {
                if existing != handle {
                    self.fetcher.release(&handle);
                }
                existing
            }
            None => {
                self.handles
                    .borrow_mut()
                    .insert(key.to_string(), handle.clone());
                handle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::MemoryStore;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeFetcher {
        calls: RefCell<Vec<String>>,
        released: RefCell<Vec<String>>,
        fail: Cell<bool>,
        counter: Cell<u32>,
    }

    impl ImageFetcher for Rc<FakeFetcher> {
        async fn fetch_handle(&self, url: &str) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(url.to_string());
            tokio::task::yield_now().await;
            if self.fail.get() {
                return Err(FetchError::HttpError(404));
            }
            self.counter.set(self.counter.get() + 1);
            Ok(format!("blob:{}", self.counter.get()))
        }

        fn release(&self, handle: &str) {
            self.released.borrow_mut().push(handle.to_string());
        }
    }

    fn cache() -> (ImageCache<Rc<FakeFetcher>, Rc<MemoryStore>>, Rc<FakeFetcher>, Rc<MemoryStore>) {
        let fetcher = Rc::new(FakeFetcher::default());
        let store = Rc::new(MemoryStore::new());
        let cache = ImageCache::new("https://host/data", fetcher.clone(), store.clone());
        (cache, fetcher, store)
    }

    fn book(author: &str, name: &str, cover: bool) -> Book {
        Book {
            author: author.to_string(),
            name: name.to_string(),
            is_cover_img: cover,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_is_memoized() {
        let (cache, fetcher, _) = cache();

        let first = cache.resolve("Leo Tolstoy", "War and Peace").await;
        let second = cache.resolve("Leo Tolstoy", "War and Peace").await;

        assert_eq!(first.as_deref(), Some("blob:1"));
        assert_eq!(first, second);
        assert_eq!(
            *fetcher.calls.borrow(),
            vec!["https://host/data/author/Leo%20Tolstoy/War%20and%20Peace.jpg".to_string()]
        );
    }

    #[tokio::test]
    async fn test_success_records_durable_flag() {
        let (cache, _, store) = cache();
        assert!(!cache.was_fetched_before("A", "X"));

        cache.resolve("A", "X").await;

        assert!(cache.was_fetched_before("A", "X"));
        assert_eq!(store.get_item("img-cache-A|X").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_failure_returns_none_without_flag() {
        let (cache, fetcher, _) = cache();
        fetcher.fail.set(true);

        assert_eq!(cache.resolve("A", "X").await, None);
        assert!(cache.cached("A", "X").is_none());
        assert!(!cache.was_fetched_before("A", "X"));

        // Not memoized: a later attempt goes back to the network.
        fetcher.fail.set(false);
        assert!(cache.resolve("A", "X").await.is_some());
        assert_eq!(fetcher.calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_preload_only_covers() {
        let (cache, fetcher, _) = cache();
        let books = vec![book("A", "X", true), book("B", "Y", false), book("C", "Z", true)];

        cache.preload(&books).await;
        assert_eq!(fetcher.calls.borrow().len(), 2);
        assert!(cache.cached("A", "X").is_some());
        assert!(cache.cached("B", "Y").is_none());

        cache.preload(&books).await;
        assert_eq!(fetcher.calls.borrow().len(), 2);
    }

    #[test]
    fn test_duplicate_handle_is_released() {
        let (cache, fetcher, _) = cache();
        assert_eq!(cache.insert("A|X", "blob:first".to_string()), "blob:first");
        assert_eq!(cache.insert("A|X", "blob:second".to_string()), "blob:first");
        assert_eq!(cache.insert("A|X", "blob:first".to_string()), "blob:first");

        assert_eq!(cache.cached("A", "X").as_deref(), Some("blob:first"));
        assert_eq!(*fetcher.released.borrow(), vec!["blob:second".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_live_handle() {
        let (cache, fetcher, _) = cache();

        let (first, second) = tokio::join!(cache.resolve("A", "X"), cache.resolve("A", "X"));

        let first = first.unwrap();
        let second = second.unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.cached("A", "X"), Some(first.clone()));
        assert_eq!(fetcher.calls.borrow().len(), 2);
        assert_eq!(fetcher.released.borrow().len(), 1);
        for released in fetcher.released.borrow().iter() {
            assert_ne!(released, &first);
        }
    }

    #[tokio::test]
    async fn test_release_all_keeps_flags() {
        let (cache, fetcher, _) = cache();
        cache.resolve("A", "X").await;
        cache.resolve("B", "Y").await;
        cache.release_all();

        assert!(cache.cached("A", "X").is_none());
        assert!(cache.cached("B", "Y").is_none());
        assert_eq!(fetcher.released.borrow().len(), 2);
        assert!(cache.was_fetched_before("A", "X"));
    }
}
