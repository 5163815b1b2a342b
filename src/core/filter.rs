//! Catalog filtering and facet derivation.
//!
//! Everything here is pure: callers recompute on every read, so the result
//! always reflects the latest catalog, filter and favorites.

use std::collections::BTreeSet;

use crate::core::favorites::Favorites;
use crate::models::{Book, FilterState};

/// Books satisfying every active constraint, in catalog order.
pub fn apply(catalog: &[Book], filter: &FilterState, favorites: &Favorites) -> Vec<Book> {
    let query = filter.search_query.to_lowercase();

    catalog
        .iter()
        .filter(|book| query.is_empty() || book.name.to_lowercase().contains(&query))
        .filter(|book| {
            filter
                .selected_author
                .as_ref()
                .is_none_or(|author| &book.author == author)
        })
        .filter(|book| {
            filter
                .selected_category
                .as_deref()
                .is_none_or(|category| book.category.as_deref() == Some(category))
        })
        .filter(|book| !filter.favorites_only || favorites.is_favorite(book))
        .cloned()
        .collect()
}

/// Sorted distinct authors across the whole catalog.
pub fn authors(catalog: &[Book]) -> Vec<String> {
    catalog
        .iter()
        .map(|book| book.author.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct categories, skipping missing or blank ones.
pub fn categories(catalog: &[Book]) -> Vec<String> {
    catalog
        .iter()
        .filter_map(|book| book.category().map(String::from))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The first `limit` books that declare a cover image.
pub fn covers_to_preload(filtered: &[Book], limit: usize) -> Vec<&Book> {
    filtered
        .iter()
        .filter(|book| book.is_cover_img)
        .take(limit)
        .collect()
}
