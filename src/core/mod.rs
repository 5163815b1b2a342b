//! Core logic for the book browser.
//!
//! This module provides:
//! - [`catalog`] loading from the static summary endpoint
//! - [`filter`] derivation of the visible grid and its facets
//! - [`favorites`] persisted to localStorage
//! - [`image_cache`] for cover blobs
//! - [`navigation`] between modals, synchronized with browser history
//! - [`reader`] sessions over the e-book engine
//! - [`download`] of EPUB files

pub mod catalog;
pub mod download;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod image_cache;
pub mod navigation;
pub mod reader;
