//! UI components built with Leptos.
//!
//! - [`library`] - Catalog page: toolbar, cover grid, covers
//! - [`router`] - Modal routing synchronized with browser history
//! - [`detail`] - Book detail modal
//! - [`reader`] - EPUB reader overlay
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod detail;
pub mod icons;
pub mod library;
pub mod reader;
pub mod router;

pub use library::Library;
