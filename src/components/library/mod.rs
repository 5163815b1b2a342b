//! Library page: header, filter toolbar, cover grid and modals.

mod cover;
mod grid;
mod toolbar;

use leptos::prelude::*;

pub use cover::Cover;
use grid::BookGrid;
use toolbar::Toolbar;

use crate::app::AppContext;
use crate::components::router::{ModalRouter, modal_open};
use crate::config::APP_NAME;
use crate::core::catalog::CatalogState;

stylance::import_crate_style!(css, "src/components/library/library.module.css");

#[component]
pub fn Library() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let total = Signal::derive(move || ctx.catalog.with(|c| c.books().len()));
    let shown = Signal::derive(move || ctx.filtered.with(Vec::len));
    let locked = Signal::derive(move || ctx.modal.with(modal_open));

    view! {
        <div class=move || if locked.get() {
            format!("{} {}", css::library, css::locked)
        } else {
            css::library.to_string()
        }>
            <header class=css::header>
                <h1 class=css::appName>{APP_NAME}</h1>
                <Show when=move || { total.get() > 0 }>
                    <span class=css::count>{move || format!("{} of {} books", shown.get(), total.get())}</span>
                </Show>
            </header>

            <Toolbar />

            {move || ctx.catalog.with(|state| match state {
                CatalogState::Loading => view! {
                    <div class=css::status>"Loading catalog..."</div>
                }.into_any(),
                CatalogState::Failed(err) => view! {
                    <div class=format!("{} {}", css::status, css::error) role="alert">
                        <p>"The book catalog could not be loaded."</p>
                        <p class=css::errorDetail>{err.clone()}</p>
                    </div>
                }.into_any(),
                CatalogState::Ready(_) => ().into_any(),
            })}

            <Show when=move || { ctx.catalog.with(|c| !c.is_loading() && c.error().is_none()) && shown.get() == 0 }>
                <div class=css::status>"No books match the current filters."</div>
            </Show>

            <BookGrid />
            <ModalRouter />
        </div>
    }
}
