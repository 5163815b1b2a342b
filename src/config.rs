//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! The content base URL is baked in at build time from `BOOKSHELF_BASE_URL`.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the header.
pub const APP_NAME: &str = "Bookshelf";

// =============================================================================
// Network Configuration
// =============================================================================

/// Base URL used when `BOOKSHELF_BASE_URL` is not set at build time.
const DEFAULT_BASE_URL: &str = "https://books.example.org/data";

/// Catalog document path (relative to the base URL).
pub const SUMMARY_PATH: &str = "summary.json";

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

/// Get the content base URL, without a trailing slash.
pub fn base_url() -> &'static str {
    option_env!("BOOKSHELF_BASE_URL")
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
}

// =============================================================================
// Catalog Configuration
// =============================================================================

/// Books declaring a smaller `size_in_bytes` than this are dropped on load.
pub const MIN_BOOK_SIZE_BYTES: u64 = 1024;

// =============================================================================
// Storage Configuration
// =============================================================================

/// localStorage key holding the serialized favorites array.
pub const FAVORITES_KEY: &str = "favorites";

/// localStorage key prefix for "cover fetched once" flags.
pub const IMAGE_FLAG_PREFIX: &str = "img-cache-";

// =============================================================================
// Image Cache Configuration
// =============================================================================

/// Number of filtered books whose covers are preloaded after each filter change.
pub const PRELOAD_LIMIT: usize = 20;

// =============================================================================
// URL Fragments
// =============================================================================

/// Fragment prefix while the detail modal is open.
pub const DETAIL_FRAGMENT_PREFIX: &str = "book-";

/// Fragment prefix while the reader is open.
pub const READER_FRAGMENT_PREFIX: &str = "reading-";

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
