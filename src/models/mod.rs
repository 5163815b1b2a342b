//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`Book`], [`BookKey`], [`Summary`] - Catalog entries as served by `summary.json`
//! - [`FilterState`] - User-controlled grid filters
//! - [`ModalState`], [`HistoryState`] - Modal navigation and its history tags

mod book;
mod filter;
mod route;

pub use book::{Book, BookKey, Summary};
pub use filter::FilterState;
pub use route::{HistoryState, ModalState, ModalTarget, parse_fragment};
