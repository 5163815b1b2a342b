//! Book cover image backed by the session cover cache.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/library/library.module.css");

/// Cover for one book.
///
/// Resolution order: cached blob handle, freshly fetched blob, then the
/// direct remote URL. Books without a declared cover, and covers whose
/// `<img>` fails to load, show a placeholder.
#[component]
pub fn Cover(author: String, name: String, has_cover: bool) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let (failed, set_failed) = signal(false);

    let alt = format!("Cover of {}", name);
    let placeholder = move || {
        view! {
            <div class=css::coverPlaceholder aria-hidden="true">
                <Icon icon=ic::BOOK />
            </div>
        }
    };

    if !has_cover {
        return placeholder().into_any();
    }

    let covers = ctx.covers();
    let warm = covers.cached(&author, &name);
    // Shown while resolving, if this cover has loaded in an earlier session
    let hinted = (warm.is_none() && covers.was_fetched_before(&author, &name))
        .then(|| covers.remote_url(&author, &name));

    let src = LocalResource::new(move || {
        let covers = ctx.covers();
        let (author, name) = (author.clone(), name.clone());
        async move {
            covers
                .resolve(&author, &name)
                .await
                .unwrap_or_else(|| covers.remote_url(&author, &name))
        }
    });

    let current = move || src.get().or_else(|| warm.clone()).or_else(|| hinted.clone());

    view! {
        {move || match current() {
            Some(url) if !failed.get() => view! {
                <img
                    class=css::coverImage
                    src=url
                    alt=alt.clone()
                    loading="lazy"
                    on:error=move |_| set_failed.set(true)
                />
            }.into_any(),
            _ => placeholder().into_any(),
        }}
    }
    .into_any()
}
