//! Chapter model - one numbered unit of the catalog.

use serde::{Deserialize, Serialize};

/// 1-based chapter number.
pub type ChapterNumber = u32;

/// A chapter record as supplied by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter number (1..N)
    pub number: ChapterNumber,

    /// Pre-rendered Hebrew numeral, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hebrew_number: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Verse text
    pub verses: Verses,
}

/// Verse text of a chapter: either one block or an ordered list of verses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Verses {
    /// The whole chapter as a single string
    Single(String),
    /// One string per verse
    Many(Vec<String>),
}

impl Verses {
    /// Iterate the verses in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Many(verses) => verses,
        };
        slice.iter().map(String::as_str)
    }

    /// Number of verses.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(verses) => verses.len(),
        }
    }

    /// Whether there is no verse text at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Many(verses) => verses.is_empty(),
        }
    }
}

impl Default for Verses {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}
