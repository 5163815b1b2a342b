//! Modal router.
//!
//! Keeps the detail and reader modals in step with browser history.
//! Uses native popstate events instead of leptos_router: each history entry
//! carries a [`HistoryState`](crate::models::HistoryState) tag, so back and
//! forward resolve directly to the modal to show.
//!
//! # Architecture
//!
//! - **Navigator is the source of truth**: `AppContext::modal` mirrors it
//! - **Library never re-renders on navigation**: the grid stays mounted
//! - **Modals are conditional**: only the one matching the state is mounted,
//!   and unmounting the reader tears its session down

use leptos::{ev, prelude::*};
use leptos_use::use_event_listener;

use crate::app::AppContext;
use crate::components::detail::DetailModal;
use crate::components::reader::ReaderOverlay;
use crate::core::navigation::BrowserHistory;
use crate::models::ModalState;

/// Renders the modal for the current [`ModalState`] and listens for popstate.
#[component]
pub fn ModalRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    // Listener lives as long as the router; leptos-use removes it on cleanup.
    let _ = use_event_listener(window(), ev::popstate, move |event| {
        ctx.on_history_pop(BrowserHistory::decode(event.state()));
    });

    // Resolve the open modal to its catalog entry
    let open = Memo::new(move |_| {
        let state = ctx.modal.get();
        let book = state.book().and_then(|key| ctx.find_book(key))?;
        Some((state.is_reader(), book))
    });

    view! {
        {move || match open.get() {
            Some((false, book)) => view! { <DetailModal book=book /> }.into_any(),
            Some((true, book)) => view! { <ReaderOverlay book=book /> }.into_any(),
            None => ().into_any(),
        }}
    }
}

/// Whether any modal is open (used to lock background scrolling).
pub fn modal_open(state: &ModalState) -> bool {
    state.book().is_some()
}
