//! Modal state and its browser-history representation.
//!
//! URL format while a modal is open:
//! - `#book-{name}` for the detail view
//! - `#reading-{name}` for the reader
//!
//! The history entry itself carries the state tag, so back/forward can be
//! resolved from `history.state` alone.

use serde::{Deserialize, Serialize};

use crate::config::{DETAIL_FRAGMENT_PREFIX, READER_FRAGMENT_PREFIX};
use crate::models::BookKey;
use crate::utils::url::{decode_component, encode_component};

/// Which modal is open, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    DetailOpen(BookKey),
    ReaderOpen(BookKey),
}

impl ModalState {
    /// Book shown by the open modal.
    pub fn book(&self) -> Option<&BookKey> {
        match self {
            Self::Closed => None,
            Self::DetailOpen(key) | Self::ReaderOpen(key) => Some(key),
        }
    }

    pub fn is_reader(&self) -> bool {
        matches!(self, Self::ReaderOpen(_))
    }

    /// History tag that must sit on top of the stack while in this state.
    pub fn history_state(&self) -> Option<HistoryState> {
        match self {
            Self::Closed => None,
            Self::DetailOpen(key) => Some(HistoryState::detail(key)),
            Self::ReaderOpen(key) => Some(HistoryState::reader(key)),
        }
    }

    /// URL fragment for this state, including the leading `#`.
    ///
    /// Returns an empty string when closed.
    pub fn fragment(&self) -> String {
        match self {
            Self::Closed => String::new(),
            Self::DetailOpen(key) => {
                format!("#{}{}", DETAIL_FRAGMENT_PREFIX, encode_component(&key.name))
            }
            Self::ReaderOpen(key) => {
                format!("#{}{}", READER_FRAGMENT_PREFIX, encode_component(&key.name))
            }
        }
    }
}

/// State object stored in a browser history entry.
///
/// Serializes as `{ "bookDetail": true, "bookName": ... }` or
/// `{ "epubReader": true, "bookName": ... }`. `bookAuthor` disambiguates
/// titles shared by several authors and may be absent in older entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    #[serde(default, skip_serializing_if = "is_false")]
    pub book_detail: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub epub_reader: bool,
    #[serde(default)]
    pub book_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_author: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl HistoryState {
    pub fn detail(key: &BookKey) -> Self {
        Self {
            book_detail: true,
            book_name: key.name.clone(),
            book_author: Some(key.author.clone()),
            ..Default::default()
        }
    }

    pub fn reader(key: &BookKey) -> Self {
        Self {
            epub_reader: true,
            book_name: key.name.clone(),
            book_author: Some(key.author.clone()),
            ..Default::default()
        }
    }

    /// Modal kind encoded by this entry; `None` for untagged entries.
    pub fn target(&self) -> Option<ModalTarget> {
        if self.book_name.is_empty() {
            None
        } else if self.epub_reader {
            Some(ModalTarget::Reader)
        } else if self.book_detail {
            Some(ModalTarget::Detail)
        } else {
            None
        }
    }
}

/// Modal kind, independent of the book it shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalTarget {
    Detail,
    Reader,
}

/// Parse a deep-link fragment into a modal kind and a decoded book name.
pub fn parse_fragment(hash: &str) -> Option<(ModalTarget, String)> {
    let hash = hash.trim_start_matches('#');

    let (target, name) = if let Some(name) = hash.strip_prefix(DETAIL_FRAGMENT_PREFIX) {
        (ModalTarget::Detail, name)
    } else if let Some(name) = hash.strip_prefix(READER_FRAGMENT_PREFIX) {
        (ModalTarget::Reader, name)
    } else {
        return None;
    };

    if name.is_empty() {
        return None;
    }
    Some((target, decode_component(name)))
}
