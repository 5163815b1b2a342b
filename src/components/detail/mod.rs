//! Book detail modal.
//!
//! Shows metadata for the selected book with actions to read, download
//! and favorite it. Closing replaces the history entry instead of going back.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use leptos_use::use_event_listener;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::library::Cover;
use crate::config::base_url;
use crate::core::download::{self, DownloadOutcome};
use crate::models::Book;
use crate::utils::format::{format_pages, format_size};

stylance::import_crate_style!(css, "src/components/detail/detail.module.css");

#[component]
pub fn DetailModal(book: Book) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let (downloading, set_downloading) = signal(false);

    let _ = use_event_listener(window(), ev::keydown, move |event| {
        if event.key() == "Escape" {
            event.prevent_default();
            ctx.close_modal();
        }
    });

    let favorite_book = book.clone();
    let is_favorite = Signal::derive(move || ctx.favorites.with(|f| f.is_favorite(&favorite_book)));

    let toggle_book = book.clone();
    let on_favorite = move |_: ev::MouseEvent| ctx.toggle_favorite(&toggle_book);

    let download_book = book.clone();
    let on_download = move |_: ev::MouseEvent| {
        if downloading.get_untracked() {
            return;
        }
        set_downloading.set(true);
        let book = download_book.clone();
        spawn_local(async move {
            if download::download(&book, base_url()).await == DownloadOutcome::Failed {
                crate::utils::dom::alert("Download failed. Please try again later.");
            }
            let _ = set_downloading.try_set(false);
        });
    };

    let facts: Vec<(&'static str, String)> = [
        ("Author", Some(book.author.clone())),
        ("Category", book.category().map(String::from)),
        ("Language", book.language.clone()),
        ("Published", book.published_date.clone()),
        ("Length", format_pages(book.pages)),
        ("File size", book.size_in_bytes.map(|s| format_size(Some(s)))),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect();

    let blurb = book.description.clone().or_else(|| book.summary.clone());

    view! {
        <div class=css::backdrop on:click=move |_| ctx.close_modal()>
            <div
                class=css::modal
                role="dialog"
                aria-modal="true"
                aria-label=book.name.clone()
                on:click=|event: ev::MouseEvent| event.stop_propagation()
            >
                <button class=css::closeButton title="Close (Esc)" on:click=move |_| ctx.close_modal()>
                    <Icon icon=ic::CLOSE />
                </button>

                <div class=css::cover>
                    <Cover
                        author=book.author.clone()
                        name=book.name.clone()
                        has_cover=book.is_cover_img
                    />
                </div>

                <div class=css::body>
                    <h2 class=css::title>{book.name.clone()}</h2>
                    <dl class=css::facts>
                        {facts
                            .into_iter()
                            .map(|(label, value)| view! {
                                <dt>{label}</dt>
                                <dd>{value}</dd>
                            })
                            .collect::<Vec<_>>()}
                    </dl>
                    {blurb.map(|text| view! { <p class=css::description>{text}</p> })}

                    <div class=css::actions>
                        <button class=css::primary on:click=move |_| ctx.open_reader()>
                            <Icon icon=ic::READ />
                            "Read"
                        </button>
                        <button
                            class=css::secondary
                            on:click=on_download
                            disabled=move || downloading.get()
                        >
                            <Icon icon=ic::DOWNLOAD />
                            {move || if downloading.get() { "Downloading..." } else { "Download" }}
                        </button>
                        <button
                            class=move || if is_favorite.get() {
                                format!("{} {}", css::secondary, css::favorite)
                            } else {
                                css::secondary.to_string()
                            }
                            on:click=on_favorite
                            aria-pressed=move || is_favorite.get().to_string()
                        >
                            {move || if is_favorite.get() {
                                view! { <Icon icon=ic::HEART_FILL /> }.into_any()
                            } else {
                                view! { <Icon icon=ic::HEART /> }.into_any()
                            }}
                            {move || if is_favorite.get() { "Favorited" } else { "Favorite" }}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
