//! Book catalog types as served by `summary.json`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Root document of the catalog endpoint.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Summary {
    /// All books, in catalog order.
    #[serde(default)]
    pub book: Vec<Book>,
}

/// A single catalog entry.
///
/// Identity is the `(author, name)` pair; see [`Book::key`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Book {
    /// Title, also used as the file stem for cover and document.
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, rename = "publishedDate")]
    pub published_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub pages: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Whether a `.jpg` cover exists next to the document.
    #[serde(default, rename = "isCoverImg")]
    pub is_cover_img: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub size_in_bytes: Option<u64>,
}

/// Non-negative count that may be written as an integer or a float.
///
/// Fractions are truncated; negative or non-finite values read as missing.
fn lenient_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .and_then(|v| T::try_from(v as u64).ok()))
}

impl Book {
    /// Composite identity key (`author|name`).
    pub fn key(&self) -> BookKey {
        BookKey::new(&self.author, &self.name)
    }

    /// Category, treating an empty string as missing.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Composite `author|name` key used by favorites and the image cache.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookKey {
    pub author: String,
    pub name: String,
}

impl BookKey {
    pub fn new(author: &str, name: &str) -> Self {
        Self {
            author: author.to_string(),
            name: name.to_string(),
        }
    }

    /// Returns `true` if this key identifies `book`.
    pub fn matches(&self, book: &Book) -> bool {
        self.author == book.author && self.name == book.name
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.author, self.name)
    }
}
