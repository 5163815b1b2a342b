//! Filter toolbar: search, author and category selectors, favorites toggle.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::filter;

stylance::import_crate_style!(css, "src/components/library/library.module.css");

#[component]
pub fn Toolbar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    // Facets come from the whole catalog, not the filtered view
    let authors = Memo::new(move |_| ctx.catalog.with(|c| filter::authors(c.books())));
    let categories = Memo::new(move |_| ctx.catalog.with(|c| filter::categories(c.books())));

    let favorites_only = Signal::derive(move || ctx.filter.with(|f| f.favorites_only));
    let favorite_count = Signal::derive(move || ctx.favorites.with(|f| f.count()));
    let is_active = Signal::derive(move || ctx.filter.with(|f| f.is_active()));

    let on_search = move |event: ev::Event| {
        let value = event_target_value(&event);
        ctx.filter.update(|f| f.search_query = value);
    };

    let on_author = move |event: ev::Event| {
        let value = event_target_value(&event);
        ctx.filter.update(|f| f.set_author(&value));
    };

    let on_category = move |event: ev::Event| {
        let value = event_target_value(&event);
        ctx.filter.update(|f| f.set_category(&value));
    };

    let on_favorites = move |_: ev::MouseEvent| {
        ctx.filter.update(|f| f.favorites_only = !f.favorites_only);
    };

    let on_reset = move |_: ev::MouseEvent| ctx.filter.update(|f| f.reset());

    view! {
        <div class=css::toolbar role="search">
            <label class=css::search>
                <span class=css::searchIcon aria-hidden="true"><Icon icon=ic::SEARCH /></span>
                <input
                    type="search"
                    placeholder="Search titles"
                    aria-label="Search titles"
                    prop:value=move || ctx.filter.with(|f| f.search_query.clone())
                    on:input=on_search
                />
            </label>

            <select
                class=css::select
                aria-label="Author"
                prop:value=move || ctx.filter.with(|f| f.selected_author.clone().unwrap_or_default())
                on:change=on_author
            >
                <option value="">"All authors"</option>
                <For
                    each=move || authors.get()
                    key=|author| author.clone()
                    children=move |author| {
                        view! { <option value=author.clone()>{author.clone()}</option> }
                    }
                />
            </select>

            <select
                class=css::select
                aria-label="Category"
                prop:value=move || ctx.filter.with(|f| f.selected_category.clone().unwrap_or_default())
                on:change=on_category
            >
                <option value="">"All categories"</option>
                <For
                    each=move || categories.get()
                    key=|category| category.clone()
                    children=move |category| {
                        view! { <option value=category.clone()>{category.clone()}</option> }
                    }
                />
            </select>

            <button
                class=move || if favorites_only.get() {
                    format!("{} {}", css::toggle, css::toggleOn)
                } else {
                    css::toggle.to_string()
                }
                aria-pressed=move || favorites_only.get().to_string()
                on:click=on_favorites
                title="Show favorites only"
            >
                <Icon icon=ic::HEART_FILL />
                <span class=css::badge>{favorite_count}</span>
            </button>

            <Show when=move || is_active.get()>
                <button class=css::toggle on:click=on_reset title="Clear filters">
                    <Icon icon=ic::RESET />
                </button>
            </Show>
        </div>
    }
}
