//! User-controlled filter state for the catalog grid.

/// Active filter constraints.
///
/// An empty query or `None` selection means "no constraint" for that facet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring matched against the book name.
    pub search_query: String,
    /// Exact author match.
    pub selected_author: Option<String>,
    /// Exact category match.
    pub selected_category: Option<String>,
    /// Restrict to favorited books.
    pub favorites_only: bool,
}

impl FilterState {
    /// Returns `true` if any constraint is set.
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty()
            || self.selected_author.is_some()
            || self.selected_category.is_some()
            || self.favorites_only
    }

    /// Clear every constraint.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the author facet; an empty value clears it.
    pub fn set_author(&mut self, author: &str) {
        self.selected_author = non_empty(author);
    }

    /// Set the category facet; an empty value clears it.
    pub fn set_category(&mut self, category: &str) {
        self.selected_category = non_empty(category);
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
