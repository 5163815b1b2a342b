//! E-book reader session.
//!
//! The rendering engine (epub.js) is an opaque collaborator behind
//! [`RenderEngine`]. [`ReaderSession`] owns one engine instance for one
//! book: it opens it into the viewport, relays page turns, and tears
//! everything down on close, including keyboard listeners registered by the
//! UI through [`ReaderSession::on_close`].

use std::cell::{Cell, RefCell};

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::core::error::ReaderError;
use crate::models::Book;
use crate::utils::url::epub_url;

/// Capabilities consumed from the rendering engine.
#[allow(async_fn_in_trait)]
pub trait RenderEngine {
    /// Load the document at `url` into the element with id `viewport_id`
    /// and display its first page.
    async fn open(&self, url: &str, viewport_id: &str) -> Result<(), ReaderError>;
    fn prev(&self);
    fn next(&self);
    /// Release the engine's resources. Must be safe to call more than once.
    fn destroy(&self);
}

/// Commands reachable from the keyboard while the reader is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderCommand {
    Prev,
    Next,
    Close,
}

impl ReaderCommand {
    /// Map a `KeyboardEvent.key` value to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Prev),
            "ArrowRight" => Some(Self::Next),
            "Escape" => Some(Self::Close),
            _ => None,
        }
    }
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Opening,
    Open,
    Closed,
}

/// One reader session over one engine instance.
pub struct ReaderSession<E> {
    engine: E,
    status: Cell<SessionStatus>,
    cleanups: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl<E: RenderEngine> ReaderSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            status: Cell::new(SessionStatus::Idle),
            cleanups: RefCell::new(Vec::new()),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status.get()
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Open `book` from `base` into `viewport_id`.
    ///
    /// On failure the session is torn down before the error is returned.
    /// If [`close`](Self::close) ran while the engine was loading, the
    /// late-arriving engine is destroyed and the session stays closed.
    pub async fn open(&self, book: &Book, base: &str, viewport_id: &str) -> Result<(), ReaderError> {
        if self.status.get() != SessionStatus::Idle {
            return Ok(());
        }
        self.status.set(SessionStatus::Opening);

        let url = epub_url(base, &book.author, &book.name);
        tracing::info!(%url, "opening book");

        let result = self.engine.open(&url, viewport_id).await;

        if self.status.get() == SessionStatus::Closed {
            self.engine.destroy();
            return Ok(());
        }

        match result {
            Ok(()) => {
                self.status.set(SessionStatus::Open);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, %url, "reader open failed");
                self.close();
                Err(e)
            }
        }
    }

    pub fn prev(&self) {
        if self.status.get() == SessionStatus::Open {
            self.engine.prev();
        }
    }

    pub fn next(&self) {
        if self.status.get() == SessionStatus::Open {
            self.engine.next();
        }
    }

    /// Apply a keyboard command. Returns `true` if the session closed.
    pub fn apply(&self, command: ReaderCommand) -> bool {
        match command {
            ReaderCommand::Prev => self.prev(),
            ReaderCommand::Next => self.next(),
            ReaderCommand::Close => {
                self.close();
                return true;
            }
        }
        false
    }

    /// Register teardown work (e.g. removing a key listener) for [`close`](Self::close).
    pub fn on_close(&self, cleanup: impl FnOnce() + 'static) {
        if self.status.get() == SessionStatus::Closed {
            cleanup();
        } else {
            self.cleanups.borrow_mut().push(Box::new(cleanup));
        }
    }

    /// Destroy the engine and run registered cleanups. Idempotent.
    pub fn close(&self) {
        if self.status.replace(SessionStatus::Closed) == SessionStatus::Closed {
            return;
        }
        self.engine.destroy();
        let cleanups = std::mem::take(&mut *self.cleanups.borrow_mut());
        for cleanup in cleanups {
            cleanup();
        }
        tracing::debug!("reader session closed");
    }
}

// =============================================================================
// epub.js binding
// =============================================================================

#[wasm_bindgen]
extern "C" {
    type EpubBook;
    type Rendition;

    #[wasm_bindgen(catch, js_name = ePub)]
    fn epub_open(url: &str) -> Result<EpubBook, JsValue>;

    #[wasm_bindgen(method, js_name = renderTo)]
    fn render_to(this: &EpubBook, element_id: &str, options: &JsValue) -> Rendition;

    #[wasm_bindgen(method, js_name = destroy)]
    fn destroy_book(this: &EpubBook);

    #[wasm_bindgen(method)]
    fn display(this: &Rendition) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = prev)]
    fn prev_page(this: &Rendition) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = next)]
    fn next_page(this: &Rendition) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = destroy)]
    fn destroy_rendition(this: &Rendition);
}

#[derive(Serialize)]
struct RenderOptions {
    width: &'static str,
    height: &'static str,
    spread: &'static str,
}

/// epub.js engine, loaded as a global `ePub` by `index.html`.
#[derive(Default)]
pub struct EpubJs {
    book: RefCell<Option<EpubBook>>,
    rendition: RefCell<Option<Rendition>>,
}

impl RenderEngine for EpubJs {
    async fn open(&self, url: &str, viewport_id: &str) -> Result<(), ReaderError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(ReaderError::EngineUnavailable)?;
        if document.get_element_by_id(viewport_id).is_none() {
            return Err(ReaderError::ViewportMissing(viewport_id.to_string()));
        }

        let book = epub_open(url).map_err(|_| ReaderError::EngineUnavailable)?;
        let options = serde_wasm_bindgen::to_value(&RenderOptions {
            width: "100%",
            height: "100%",
            spread: "auto",
        })
        .map_err(|e| ReaderError::OpenFailed(e.to_string()))?;
        let rendition = book.render_to(viewport_id, &options);
        let displayed = rendition.display();

        *self.book.borrow_mut() = Some(book);
        *self.rendition.borrow_mut() = Some(rendition);

        JsFuture::from(displayed).await.map_err(|e| {
            ReaderError::OpenFailed(e.as_string().unwrap_or_else(|| "unreadable document".to_string()))
        })?;
        Ok(())
    }

    fn prev(&self) {
        if let Some(rendition) = self.rendition.borrow().as_ref() {
            let _ = rendition.prev_page();
        }
    }

    fn next(&self) {
        if let Some(rendition) = self.rendition.borrow().as_ref() {
            let _ = rendition.next_page();
        }
    }

    fn destroy(&self) {
        if let Some(rendition) = self.rendition.borrow_mut().take() {
            rendition.destroy_rendition();
        }
        if let Some(book) = self.book.borrow_mut().take() {
            book.destroy_book();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::poll_fn;
    use std::rc::Rc;
    use std::task::{Poll, Waker};

    /// Holds the engine's load until released.
    #[derive(Default)]
    struct Gate {
        released: Cell<bool>,
        waker: RefCell<Option<Waker>>,
    }

    impl Gate {
        fn release(&self) {
            self.released.set(true);
            if let Some(waker) = self.waker.borrow_mut().take() {
                waker.wake();
            }
        }

        async fn wait(&self) {
            poll_fn(|cx| {
                if self.released.get() {
                    Poll::Ready(())
                } else {
                    *self.waker.borrow_mut() = Some(cx.waker().clone());
                    Poll::Pending
                }
            })
            .await
        }
    }

    #[derive(Default)]
    struct FakeEngine {
        fail: bool,
        gate: Option<Rc<Gate>>,
        opened: RefCell<Vec<(String, String)>>,
        turns: RefCell<Vec<&'static str>>,
        destroyed: Cell<usize>,
    }

    impl RenderEngine for FakeEngine {
        async fn open(&self, url: &str, viewport_id: &str) -> Result<(), ReaderError> {
            self.opened
                .borrow_mut()
                .push((url.to_string(), viewport_id.to_string()));
            if let Some(gate) = &self.gate {
                gate.wait().await;
            }
            if self.fail {
                Err(ReaderError::OpenFailed("bad zip".to_string()))
            } else {
                Ok(())
            }
        }

        fn prev(&self) {
            self.turns.borrow_mut().push("prev");
        }

        fn next(&self) {
            self.turns.borrow_mut().push("next");
        }

        fn destroy(&self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    fn book() -> Book {
        Book {
            author: "Jane Austen".to_string(),
            name: "Emma".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(ReaderCommand::from_key("ArrowLeft"), Some(ReaderCommand::Prev));
        assert_eq!(ReaderCommand::from_key("ArrowRight"), Some(ReaderCommand::Next));
        assert_eq!(ReaderCommand::from_key("Escape"), Some(ReaderCommand::Close));
        assert_eq!(ReaderCommand::from_key("a"), None);
    }

    #[tokio::test]
    async fn test_open_resolves_epub_url() {
        let session = ReaderSession::new(FakeEngine::default());
        session.open(&book(), "https://host/data", "viewer").await.unwrap();

        assert_eq!(session.status(), SessionStatus::Open);
        assert_eq!(
            *session.engine().opened.borrow(),
            vec![(
                "https://host/data/author/Jane%20Austen/Emma.epub".to_string(),
                "viewer".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_page_turns_delegate_when_open() {
        let session = ReaderSession::new(FakeEngine::default());
        session.next();
        assert!(session.engine().turns.borrow().is_empty());

        session.open(&book(), "b", "v").await.unwrap();
        assert!(!session.apply(ReaderCommand::Next));
        assert!(!session.apply(ReaderCommand::Prev));
        assert_eq!(*session.engine().turns.borrow(), vec!["next", "prev"]);
    }

    #[tokio::test]
    async fn test_open_failure_tears_down() {
        let engine = FakeEngine {
            fail: true,
            ..Default::default()
        };
        let session = ReaderSession::new(engine);
        let removed = Rc::new(Cell::new(false));
        let flag = removed.clone();
        session.on_close(move || flag.set(true));

        let err = session.open(&book(), "b", "v").await.unwrap_err();
        assert_eq!(err, ReaderError::OpenFailed("bad zip".to_string()));
        assert_eq!(session.status(), SessionStatus::Closed);
        assert_eq!(session.engine().destroyed.get(), 1);
        assert!(removed.get());
    }

    #[tokio::test]
    async fn test_close_runs_cleanups_once() {
        let session = ReaderSession::new(FakeEngine::default());
        session.open(&book(), "b", "v").await.unwrap();

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        session.on_close(move || c.set(c.get() + 1));

        assert!(session.apply(ReaderCommand::Close));
        session.close();

        assert_eq!(count.get(), 1);
        assert_eq!(session.engine().destroyed.get(), 1);

        session.next();
        assert!(session.engine().turns.borrow().is_empty());
    }

    #[test]
    fn test_cleanup_after_close_runs_immediately() {
        let session = ReaderSession::new(FakeEngine::default());
        session.close();

        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        session.on_close(move || r.set(true));
        assert!(ran.get());
    }

    #[tokio::test]
    async fn test_open_after_close_is_ignored() {
        let session = ReaderSession::new(FakeEngine::default());
        session.close();
        session.open(&book(), "b", "v").await.unwrap();
        assert!(session.engine().opened.borrow().is_empty());
        assert_eq!(session.status(), SessionStatus::Closed);
    }

    #[tokio::test]
    async fn test_close_during_open_destroys_late_engine() {
        let gate = Rc::new(Gate::default());
        let engine = FakeEngine {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let session = ReaderSession::new(engine);
        let cleanups = Rc::new(Cell::new(0));
        let c = cleanups.clone();
        session.on_close(move || c.set(c.get() + 1));

        let close_while_loading = async {
            // Wait until the engine has started loading
            poll_fn(|cx| {
                if session.engine().opened.borrow().is_empty() {
                    cx.waker().wake_by_ref();
                    Poll::Pending
                } else {
                    Poll::Ready(())
                }
            })
            .await;
            session.close();
            gate.release();
        };

        let b = book();
        let (result, ()) = tokio::join!(session.open(&b, "b", "v"), close_while_loading);

        assert_eq!(result, Ok(()));
        assert_eq!(session.status(), SessionStatus::Closed);
        assert_eq!(session.engine().destroyed.get(), 2);
        assert_eq!(cleanups.get(), 1);
        assert!(session.engine().turns.borrow().is_empty());
    }
}
