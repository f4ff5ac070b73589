//! Quote and Tag Records
//!
//! Wire types for the quotation service. These are deserialized straight
//! from the service's JSON and then handed to the UI unchanged.

use serde::{Deserialize, Serialize};

/// A single quote returned by the random-quote endpoint
///
/// Immutable once received. The quote panel holds at most one of these and
/// replaces it wholesale on every successful fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Opaque identifier assigned by the service
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// The quote text
    pub content: String,
    /// Attributed author
    pub author: String,
    /// Tags attached to this quote, in service order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Quote {
    /// Author line as displayed under the quote
    #[must_use]
    pub fn attribution(&self) -> String {
        format!("— {}", self.author)
    }

    /// Whether the quote carries any tags worth rendering
    #[must_use]
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// A record from the tag-listing endpoint
///
/// Only `name` is consumed; the service sends more fields (slug, counts)
/// which are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TagRecord {
    /// Display name of the tag
    pub name: String,
}

impl TagRecord {
    /// Create a tag record
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Lower-case and deduplicate tag names, keeping first-seen order
///
/// `"Love"` and `"love"` collapse into a single `"love"` at the position of
/// the first occurrence.
pub fn normalize_tags<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    for name in names {
        let lowered = name.as_ref().to_lowercase();
        if !tags.contains(&lowered) {
            tags.push(lowered);
        }
    }
    tags
}
