//! Grid of book cards for the filtered view.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::library::Cover;
use crate::models::Book;
use crate::utils::format::truncate;

const TITLE_MAX_CHARS: usize = 60;

stylance::import_crate_style!(css, "src/components/library/library.module.css");

#[component]
pub fn BookGrid() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <div class=css::grid role="list">
            <For
                each=move || ctx.filtered.get()
                key=|book| book.key()
                children=move |book| view! { <BookCard book=book /> }
            />
        </div>
    }
}

#[component]
fn BookCard(book: Book) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let favorite_book = book.clone();
    let is_favorite = Signal::derive(move || ctx.favorites.with(|f| f.is_favorite(&favorite_book)));

    let select_book = book.clone();
    let on_select = move |_: ev::MouseEvent| ctx.select_book(&select_book);

    let toggle_book = book.clone();
    let on_favorite = move |event: ev::MouseEvent| {
        // Don't open the detail view as well
        event.stop_propagation();
        ctx.toggle_favorite(&toggle_book);
    };

    let keyboard_book = book.clone();
    let on_keydown = move |event: ev::KeyboardEvent| {
        if event.key() == "Enter" {
            ctx.select_book(&keyboard_book);
        }
    };

    view! {
        <div
            class=css::card
            role="listitem"
            tabindex="0"
            aria-label=format!("{} by {}", book.name, book.author)
            on:click=on_select
            on:keydown=on_keydown
        >
            <div class=css::cardCover>
                <Cover author=book.author.clone() name=book.name.clone() has_cover=book.is_cover_img />
                <button
                    class=move || if is_favorite.get() {
                        format!("{} {}", css::heart, css::heartOn)
                    } else {
                        css::heart.to_string()
                    }
                    title=move || if is_favorite.get() { "Remove from favorites" } else { "Add to favorites" }
                    on:click=on_favorite
                >
                    {move || if is_favorite.get() {
                        view! { <Icon icon=ic::HEART_FILL /> }.into_any()
                    } else {
                        view! { <Icon icon=ic::HEART /> }.into_any()
                    }}
                </button>
            </div>
            <div class=css::cardTitle title=book.name.clone()>{truncate(&book.name, TITLE_MAX_CHARS)}</div>
            <div class=css::cardAuthor>{book.author.clone()}</div>
        </div>
    }
}
