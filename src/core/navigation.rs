//! Modal navigation synchronized with browser history.
//!
//! [`Navigator`] is a small state machine over [`ModalState`]. Forward
//! actions (selecting a book, opening the reader) push exactly one history
//! entry; programmatic closes replace the current entry; only the browser's
//! back/forward buttons pop, and those are fed back through
//! [`Navigator::on_pop`] without pushing anything.

use wasm_bindgen::JsValue;

use crate::models::{Book, BookKey, HistoryState, ModalState, ModalTarget, parse_fragment};
use crate::utils::dom;

/// Browser history operations the navigator relies on.
pub trait HistoryBackend {
    /// Push a new entry carrying `state`, with URL fragment `fragment`.
    fn push(&self, state: &HistoryState, fragment: &str);

    /// Replace the current entry. An empty `fragment` clears the URL hash.
    fn replace(&self, state: Option<&HistoryState>, fragment: &str);
}

/// `window.history` with state objects converted by `serde-wasm-bindgen`.
pub struct BrowserHistory;

impl BrowserHistory {
    /// Decode `history.state` (or a popstate event's state) into a tag.
    pub fn decode(value: JsValue) -> Option<HistoryState> {
        if value.is_null() || value.is_undefined() {
            return None;
        }
        serde_wasm_bindgen::from_value(value).ok()
    }

    fn encode(state: &HistoryState) -> JsValue {
        serde_wasm_bindgen::to_value(state).unwrap_or(JsValue::NULL)
    }
}

impl HistoryBackend for BrowserHistory {
    fn push(&self, state: &HistoryState, fragment: &str) {
        if let Some(history) = dom::history()
            && let Err(e) = history.push_state_with_url(&Self::encode(state), "", Some(fragment))
        {
            tracing::warn!(?e, "history.pushState failed");
        }
    }

    fn replace(&self, state: Option<&HistoryState>, fragment: &str) {
        let value = state.map(Self::encode).unwrap_or(JsValue::NULL);
        let url = if fragment.is_empty() {
            dom::path_without_hash()
        } else {
            fragment.to_string()
        };

        if let Some(history) = dom::history()
            && let Err(e) = history.replace_state_with_url(&value, "", Some(&url))
        {
            tracing::warn!(?e, "history.replaceState failed");
        }
    }
}

/// Find the catalog entry a history tag or fragment refers to.
///
/// Without an author, the first book with a matching name wins.
pub fn find_book<'a>(catalog: &'a [Book], name: &str, author: Option<&str>) -> Option<&'a Book> {
    catalog
        .iter()
        .find(|b| b.name == name && author.is_none_or(|a| b.author == a))
}

/// Modal state machine bound to a history backend.
pub struct Navigator<H> {
    history: H,
    state: ModalState,
}

impl<H: HistoryBackend> Navigator<H> {
    pub fn new(history: H) -> Self {
        Self {
            history,
            state: ModalState::Closed,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    /// Open the detail view for `book`. Ignored while the reader is open.
    pub fn select(&mut self, book: &Book) -> bool {
        if self.state.is_reader() {
            return false;
        }
        self.push(ModalState::DetailOpen(book.key()));
        true
    }

    /// Switch from the detail view to the reader for the same book.
    pub fn open_reader(&mut self) -> bool {
        let ModalState::DetailOpen(key) = &self.state else {
            return false;
        };
        let next = ModalState::ReaderOpen(key.clone());
        self.push(next);
        true
    }

    /// Close whichever modal is open, returning the state that was closed.
    pub fn close(&mut self) -> Option<ModalState> {
        if self.state == ModalState::Closed {
            return None;
        }
        self.history.replace(None, "");
        Some(std::mem::take(&mut self.state))
    }

    /// Apply a back/forward navigation that restored `entry`.
    ///
    /// An entry naming a book absent from `catalog` closes the modal and
    /// loses its tag, unless `catalog` is still empty.
    pub fn on_pop(&mut self, entry: Option<HistoryState>, catalog: &[Book]) -> &ModalState {
        let next = entry
            .as_ref()
            .and_then(|entry| {
                let target = entry.target()?;
                let book = find_book(catalog, &entry.book_name, entry.book_author.as_deref())?;
                Some(modal_for(target, book.key()))
            })
            .unwrap_or_default();

        if next == ModalState::Closed && entry.is_some_and(|e| e.target().is_some()) {
            if catalog.is_empty() {
                // Left tagged so the deep link restores once books arrive
                tracing::debug!("history entry popped before the catalog loaded");
            } else {
                tracing::debug!("history entry names an unknown book; closing");
                self.history.replace(None, "");
            }
        }

        self.state = next;
        &self.state
    }

    /// Open the modal named by a deep-link fragment such as `#book-Walden`.
    ///
    /// The current entry is replaced so it carries the matching tag.
    pub fn restore_from_fragment(&mut self, fragment: &str, catalog: &[Book]) -> &ModalState {
        let Some((target, name)) = parse_fragment(fragment) else {
            return &self.state;
        };

        match find_book(catalog, &name, None) {
            Some(book) => {
                let next = modal_for(target, book.key());
                self.history.replace(next.history_state().as_ref(), &next.fragment());
                self.state = next;
            }
            None => {
                tracing::debug!(%name, "deep link names an unknown book");
                self.history.replace(None, "");
            }
        }
        &self.state
    }

    fn push(&mut self, next: ModalState) {
        if let Some(entry) = next.history_state() {
            self.history.push(&entry, &next.fragment());
        }
        self.state = next;
    }
}

fn modal_for(target: ModalTarget, key: BookKey) -> ModalState {
    match target {
        ModalTarget::Detail => ModalState::DetailOpen(key),
        ModalTarget::Reader => ModalState::ReaderOpen(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Entry = (Option<HistoryState>, String);

    /// In-memory history stack with back/forward.
    struct FakeHistory {
        entries: RefCell<Vec<Entry>>,
        index: Cell<usize>,
        pushes: Cell<usize>,
    }

    impl FakeHistory {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                entries: RefCell::new(vec![(None, String::new())]),
                index: Cell::new(0),
                pushes: Cell::new(0),
            })
        }

        fn top(&self) -> Entry {
            self.entries.borrow()[self.index.get()].clone()
        }

        fn len(&self) -> usize {
            self.entries.borrow().len()
        }

        fn back(&self) -> Option<Option<HistoryState>> {
            let i = self.index.get();
            (i > 0).then(|| {
                self.index.set(i - 1);
                self.top().0
            })
        }

        fn forward(&self) -> Option<Option<HistoryState>> {
            let i = self.index.get();
            (i + 1 < self.len()).then(|| {
                self.index.set(i + 1);
                self.top().0
            })
        }
    }

    impl HistoryBackend for Rc<FakeHistory> {
        fn push(&self, state: &HistoryState, fragment: &str) {
            let i = self.index.get();
            let mut entries = self.entries.borrow_mut();
            entries.truncate(i + 1);
            entries.push((Some(state.clone()), fragment.to_string()));
            self.index.set(i + 1);
            self.pushes.set(self.pushes.get() + 1);
        }

        fn replace(&self, state: Option<&HistoryState>, fragment: &str) {
            self.entries.borrow_mut()[self.index.get()] = (state.cloned(), fragment.to_string());
        }
    }

    fn catalog() -> Vec<Book> {
        ["X", "Y"]
            .iter()
            .zip(["A", "B"])
            .map(|(name, author)| Book {
                name: name.to_string(),
                author: author.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn navigator() -> (Navigator<Rc<FakeHistory>>, Rc<FakeHistory>) {
        let history = FakeHistory::new();
        (Navigator::new(history.clone()), history)
    }

    fn assert_in_sync(nav: &Navigator<Rc<FakeHistory>>, history: &FakeHistory) {
        let (state, fragment) = history.top();
        assert_eq!(nav.state().history_state(), state);
        assert_eq!(nav.state().fragment(), fragment);
    }

    #[test]
    fn test_select_pushes_and_back_closes() {
        let (mut nav, history) = navigator();
        let books = catalog();

        assert!(nav.select(&books[0]));
        assert_eq!(*nav.state(), ModalState::DetailOpen(books[0].key()));
        assert_eq!(history.len(), 2);
        assert_eq!(history.top().1, "#book-X");

        let popped = history.back().unwrap();
        nav.on_pop(popped, &books);
        assert_eq!(*nav.state(), ModalState::Closed);
        assert_in_sync(&nav, &history);
    }

    #[test]
    fn test_open_reader_pushes_one_entry() {
        let (mut nav, history) = navigator();
        let books = catalog();

        nav.select(&books[1]);
        assert!(nav.open_reader());
        assert_eq!(*nav.state(), ModalState::ReaderOpen(books[1].key()));
        assert_eq!(history.pushes.get(), 2);
        assert_eq!(history.top().1, "#reading-Y");

        nav.on_pop(history.back().unwrap(), &books);
        assert_eq!(*nav.state(), ModalState::DetailOpen(books[1].key()));

        nav.on_pop(history.forward().unwrap(), &books);
        assert_eq!(*nav.state(), ModalState::ReaderOpen(books[1].key()));
        assert_eq!(history.pushes.get(), 2);
    }

    #[test]
    fn test_open_reader_requires_detail() {
        let (mut nav, history) = navigator();
        assert!(!nav.open_reader());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_select_ignored_while_reading() {
        let (mut nav, _) = navigator();
        let books = catalog();
        nav.select(&books[0]);
        nav.open_reader();
        assert!(!nav.select(&books[1]));
        assert!(nav.state().is_reader());
    }

    #[test]
    fn test_close_replaces_without_push() {
        let (mut nav, history) = navigator();
        let books = catalog();

        nav.select(&books[0]);
        let closed = nav.close();
        assert_eq!(closed, Some(ModalState::DetailOpen(books[0].key())));
        assert_eq!(history.len(), 2);
        assert_eq!(history.top(), (None, String::new()));
        assert_in_sync(&nav, &history);

        assert_eq!(nav.close(), None);
    }

    #[test]
    fn test_pop_unknown_book_closes_and_clears_tag() {
        let (mut nav, history) = navigator();
        let books = catalog();
        nav.select(&books[0]);

        nav.on_pop(Some(HistoryState::detail(&BookKey::new("Z", "Gone"))), &books);
        assert_eq!(*nav.state(), ModalState::Closed);
        assert_eq!(history.top().0, None);
    }

    #[test]
    fn test_pop_before_catalog_loads_keeps_tag() {
        let (mut nav, history) = navigator();
        let books = catalog();

        // Tagged entry reached while no books are loaded yet
        let tagged = HistoryState::detail(&books[0].key());
        history.replace(Some(&tagged), "#book-X");
        nav.on_pop(Some(tagged.clone()), &[]);

        assert_eq!(*nav.state(), ModalState::Closed);
        assert_eq!(history.top(), (Some(tagged), "#book-X".to_string()));

        nav.restore_from_fragment(&history.top().1, &books);
        assert_eq!(*nav.state(), ModalState::DetailOpen(books[0].key()));
        assert_in_sync(&nav, &history);
    }

    #[test]
    fn test_pop_legacy_entry_without_author() {
        let (mut nav, _) = navigator();
        let books = catalog();
        let entry: HistoryState =
            serde_json::from_str(r#"{"epubReader": true, "bookName": "Y"}"#).unwrap();

        nav.on_pop(Some(entry), &books);
        assert_eq!(*nav.state(), ModalState::ReaderOpen(books[1].key()));
    }

    #[test]
    fn test_restore_from_fragment() {
        let (mut nav, history) = navigator();
        let books = catalog();

        nav.restore_from_fragment("#reading-X", &books);
        assert_eq!(*nav.state(), ModalState::ReaderOpen(books[0].key()));
        assert_eq!(history.pushes.get(), 0);
        assert_in_sync(&nav, &history);
    }

    #[test]
    fn test_restore_unknown_fragment_clears_hash() {
        let (mut nav, history) = navigator();
        history.replace(None, "#book-Nope");

        nav.restore_from_fragment("#book-Nope", &catalog());
        assert_eq!(*nav.state(), ModalState::Closed);
        assert_eq!(history.top().1, "");

        nav.restore_from_fragment("#unrelated", &catalog());
        assert_eq!(*nav.state(), ModalState::Closed);
    }

    #[test]
    fn test_state_matches_top_of_stack_across_sequence() {
        #[derive(Clone, Copy)]
        enum Op {
            Select(usize),
            Read,
            Close,
            Back,
            Forward,
        }

        let (mut nav, history) = navigator();
        let books = catalog();
        let ops = [
            Op::Select(0),
            Op::Read,
            Op::Back,
            Op::Back,
            Op::Forward,
            Op::Forward,
            Op::Close,
            Op::Back,
            Op::Select(1),
            Op::Close,
            Op::Back,
            Op::Back,
            Op::Forward,
            Op::Select(0),
            Op::Read,
            Op::Close,
            Op::Forward,
            Op::Back,
        ];

        for op in ops {
            let pushes_before = history.pushes.get();
            match op {
                Op::Select(i) => {
                    let pushed = nav.select(&books[i]);
                    assert_eq!(history.pushes.get() - pushes_before, pushed as usize);
                }
                Op::Read => {
                    let pushed = nav.open_reader();
                    assert_eq!(history.pushes.get() - pushes_before, pushed as usize);
                }
                Op::Close => {
                    nav.close();
                    assert_eq!(history.pushes.get(), pushes_before);
                }
                Op::Back => {
                    if let Some(entry) = history.back() {
                        nav.on_pop(entry, &books);
                    }
                }
                Op::Forward => {
                    if let Some(entry) = history.forward() {
                        nav.on_pop(entry, &books);
                    }
                }
            }

            let state = nav.state();
            assert!(state.history_state().is_none_or(|e| !(e.book_detail && e.epub_reader)));
            assert_in_sync(&nav, &history);
        }
    }
}
