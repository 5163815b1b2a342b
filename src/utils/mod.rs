//! Utility modules for web, DOM, and storage operations.
//!
//! Provides:
//! - [`fetch_json`], [`fetch_blob`] - Network fetching with timeout
//! - [`storage`] - Durable key-value storage behind a trait
//! - [`url`] - Endpoint construction and component encoding
//! - [`format`] - Display formatting for book metadata

pub mod dom;
mod fetch;
pub mod format;
pub mod storage;
pub mod url;

pub use fetch::{fetch_blob, fetch_json};
