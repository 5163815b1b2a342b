//! Root application module.
//!
//! Contains the main App component, the [`AppContext`] holding all session
//! state, and application-level setup following Leptos conventions.

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::components::Library;
use crate::config::{PRELOAD_LIMIT, base_url};
use crate::core::catalog::{self, CatalogState, HttpCatalogSource};
use crate::core::favorites::Favorites;
use crate::core::filter;
use crate::core::image_cache::{BlobImageFetcher, ImageCache};
use crate::core::navigation::{BrowserHistory, Navigator};
use crate::models::{Book, BookKey, FilterState, HistoryState, ModalState};
use crate::utils::dom;
use crate::utils::storage::{self, SharedStore};

/// Cover cache as used by the running app.
pub type CoverCache = ImageCache<BlobImageFetcher, SharedStore>;

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and accessed from any child
/// with `use_context::<AppContext>()`.
///
/// # Architecture
///
/// - **Catalog**: loaded once, then read-only
/// - **Filter / favorites**: user-mutated inputs of the derived `filtered` view
/// - **Modal**: mirror of the [`Navigator`] state for rendering
/// - **Covers**: shared image cache, released when the root is cleaned up
///
/// # Note
///
/// This struct is `Copy` because every field is an arena handle.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub catalog: RwSignal<CatalogState>,
    pub filter: RwSignal<FilterState>,
    pub favorites: RwSignal<Favorites>,
    pub modal: RwSignal<ModalState>,
    /// Books passing the current filter, recomputed on every input change.
    pub filtered: Memo<Vec<Book>>,
    navigator: StoredValue<Navigator<BrowserHistory>>,
    store: StoredValue<SharedStore, LocalStorage>,
    covers: StoredValue<Rc<CoverCache>, LocalStorage>,
}

impl AppContext {
    /// Creates the context, loading favorites from durable storage.
    pub fn new() -> Self {
        let store = storage::open_shared();
        let favorites = RwSignal::new(Favorites::load(&store));
        let catalog = RwSignal::new(CatalogState::Loading);
        let filter_state = RwSignal::new(FilterState::default());

        let filtered = Memo::new(move |_| {
            catalog.with(|c| {
                filter_state.with(|f| favorites.with(|fav| filter::apply(c.books(), f, fav)))
            })
        });

        let covers = Rc::new(ImageCache::new(base_url(), BlobImageFetcher, store.clone()));

        Self {
            catalog,
            filter: filter_state,
            favorites,
            modal: RwSignal::new(ModalState::Closed),
            filtered,
            navigator: StoredValue::new(Navigator::new(BrowserHistory)),
            store: StoredValue::new_local(store),
            covers: StoredValue::new_local(covers),
        }
    }

    /// Fetch the catalog once, then honor any deep link in the URL.
    pub fn load_catalog(&self) {
        let ctx = *self;
        spawn_local(async move {
            let state = catalog::load(&HttpCatalogSource, base_url()).await;
            ctx.catalog.set(state);
            ctx.restore_deep_link();
        });
    }

    /// Shared cover cache.
    pub fn covers(&self) -> Rc<CoverCache> {
        self.covers.get_value()
    }

    /// Look up the catalog entry for a key.
    pub fn find_book(&self, key: &BookKey) -> Option<Book> {
        self.catalog
            .with(|c| c.books().iter().find(|b| key.matches(b)).cloned())
    }

    // ------------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------------

    pub fn toggle_favorite(&self, book: &Book) {
        let store = self.store.get_value();
        self.favorites.update(|f| {
            f.toggle(book, &store);
        });
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Open the detail modal for `book`.
    pub fn select_book(&self, book: &Book) {
        self.navigate(|nav| {
            nav.select(book);
        });
    }

    /// Switch from the detail modal to the reader.
    pub fn open_reader(&self) {
        self.navigate(|nav| {
            nav.open_reader();
        });
    }

    /// Close the open modal without adding a history entry.
    pub fn close_modal(&self) {
        self.navigate(|nav| {
            nav.close();
        });
    }

    /// React to a browser back/forward that restored `entry`.
    pub fn on_history_pop(&self, entry: Option<HistoryState>) {
        let catalog = self.catalog;
        self.navigate(|nav| {
            catalog.with_untracked(|c| {
                nav.on_pop(entry, c.books());
            });
        });
    }

    fn restore_deep_link(&self) {
        let hash = dom::get_hash();
        if hash.is_empty() {
            return;
        }
        let catalog = self.catalog;
        self.navigate(|nav| {
            catalog.with_untracked(|c| {
                nav.restore_from_fragment(&hash, c.books());
            });
        });
    }

    fn navigate(&self, f: impl FnOnce(&mut Navigator<BrowserHistory>)) {
        let mut next = None;
        self.navigator.update_value(|nav| {
            f(nav);
            next = Some(nav.state().clone());
        });
        if let Some(next) = next
            && self.modal.get_untracked() != next
        {
            self.modal.set(next);
        }
    }

    // ------------------------------------------------------------------------
    // Covers
    // ------------------------------------------------------------------------

    /// Preload covers for the head of the filtered view whenever it changes.
    fn setup_cover_preload(&self) {
        let ctx = *self;
        Effect::new(move |_| {
            let targets: Vec<Book> = ctx.filtered.with(|books| {
                filter::covers_to_preload(books, PRELOAD_LIMIT)
                    .into_iter()
                    .cloned()
                    .collect()
            });
            if targets.is_empty() {
                return;
            }
            let covers = ctx.covers();
            spawn_local(async move {
                covers.preload(&targets).await;
            });
        });
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Starts the catalog load and cover preloading
/// - Releases cached cover blobs on teardown
/// - Renders the Library inside an ErrorBoundary
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    ctx.load_catalog();
    ctx.setup_cover_preload();

    let covers = ctx.covers;
    on_cleanup(move || {
        covers.try_with_value(|c| c.release_all());
    });

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #f7f4ee;
                    color: #2b2b2b;
                    font-family: Georgia, serif;
                ">
                    <div style="max-width: 600px; text-align: center;">
                        <h1 style="color: #a33; margin-bottom: 1rem;">
                            "Something went wrong"
                        </h1>
                        <p style="color: #666; margin-bottom: 2rem;">
                            "An unexpected error occurred. Please try reloading the page."
                        </p>
                        <ul style="text-align: left; color: #a33; font-size: 0.9rem;">
                            {move || errors.get()
                                .into_iter()
                                .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                .collect::<Vec<_>>()
                            }
                        </ul>
                        <button
                            on:click=move |_| {
                                if let Some(window) = web_sys::window() {
                                    let _ = window.location().reload();
                                }
                            }
                            style="
                                background: #5a4632;
                                color: white;
                                border: none;
                                padding: 0.75rem 2rem;
                                border-radius: 4px;
                                cursor: pointer;
                            "
                        >
                            "Reload Page"
                        </button>
                    </div>
                </div>
            }
        >
            <Library />
        </ErrorBoundary>
    }
}
