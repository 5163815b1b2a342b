//! Reader overlay for EPUB documents.
//!
//! Mounts one [`ReaderSession`] per opening. The session is closed when the
//! overlay unmounts, which destroys the epub.js instance and removes the
//! page-turn key listener.

use std::rc::Rc;

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use leptos_use::use_event_listener;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::base_url;
use crate::core::reader::{EpubJs, ReaderCommand, ReaderSession, SessionStatus};
use crate::models::Book;
use crate::utils::dom;

stylance::import_crate_style!(css, "src/components/reader/reader.module.css");

/// Element id the engine renders into.
const VIEWPORT_ID: &str = "epub-viewport";

/// Full-screen reader for `book`.
///
/// Keys: `ArrowLeft` previous page, `ArrowRight` next page, `Escape` close.
#[component]
pub fn ReaderOverlay(book: Book) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let session = Rc::new(ReaderSession::new(EpubJs::default()));
    let handle = StoredValue::new_local(session.clone());
    let (loading, set_loading) = signal(true);

    let stop_keys = use_event_listener(window(), ev::keydown, move |event| {
        let Some(command) = ReaderCommand::from_key(&event.key()) else {
            return;
        };
        event.prevent_default();
        match command {
            // Closing goes through the navigator so history stays in sync;
            // unmounting then closes the session.
            ReaderCommand::Close => ctx.close_modal(),
            _ => {
                handle.with_value(|s| {
                    s.apply(command);
                });
            }
        }
    });
    session.on_close(stop_keys);

    on_cleanup(move || {
        handle.try_with_value(|s| s.close());
    });

    // Open once the viewport element is in the DOM
    let viewport_ref = NodeRef::<leptos::html::Div>::new();
    let title = book.name.clone();
    Effect::new(move |_| {
        if viewport_ref.get().is_none() {
            return;
        }
        let Some(session) = handle.try_get_value() else {
            return;
        };
        let book = book.clone();
        spawn_local(async move {
            match session.open(&book, base_url(), VIEWPORT_ID).await {
                Ok(()) if session.status() == SessionStatus::Open => {
                    let _ = set_loading.try_set(false);
                }
                Ok(()) => {}
                Err(e) => {
                    dom::alert(&format!("Could not open \"{}\": {}", book.name, e));
                    ctx.close_modal();
                }
            }
        });
    });

    let turn = move |command: ReaderCommand| {
        move |_: ev::MouseEvent| {
            handle.with_value(|s| {
                s.apply(command);
            });
        }
    };

    view! {
        <div class=css::reader role="dialog" aria-modal="true" aria-label=title.clone()>
            <header class=css::header>
                <button class=css::navButton title="Close (Esc)" on:click=move |_| ctx.close_modal()>
                    <Icon icon=ic::CLOSE />
                </button>
                <span class=css::title>{title.clone()}</span>
            </header>

            <div class=css::stage>
                <button class=css::pageButton title="Previous page" on:click=turn(ReaderCommand::Prev)>
                    <Icon icon=ic::CHEVRON_LEFT />
                </button>

                <div class=css::viewport id=VIEWPORT_ID node_ref=viewport_ref></div>
                <Show when=move || loading.get()>
                    <div class=css::loading>"Loading book..."</div>
                </Show>

                <button class=css::pageButton title="Next page" on:click=turn(ReaderCommand::Next)>
                    <Icon icon=ic::CHEVRON_RIGHT />
                </button>
            </div>
        </div>
    }
}
