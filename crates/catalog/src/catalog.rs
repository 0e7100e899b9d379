//! The immutable chapter catalog.

use std::collections::BTreeMap;
use psalms_core::{Chapter, ChapterNumber};
use tracing::{info, warn};
use super::{CatalogError, CatalogSource};

/// Ordered, read-only collection of chapters.
///
/// Built once at startup and never mutated. An empty catalog is valid: the
/// tracker then falls back to its default chapter count with no content.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    chapters: BTreeMap<ChapterNumber, Chapter>,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from records in any order. Chapter 0 and repeated numbers are
    /// dropped; the first record for a number wins.
    pub fn from_chapters(chapters: impl IntoIterator<Item = Chapter>) -> Self {
        let mut map = BTreeMap::new();
        for chapter in chapters {
            if chapter.number == 0 {
                warn!("Ignoring chapter record numbered 0");
                continue;
            }
            if map.contains_key(&chapter.number) {
                warn!("Ignoring duplicate record for chapter {}", chapter.number);
                continue;
            }
            map.insert(chapter.number, chapter);
        }
        Self { chapters: map }
    }

    /// Load from a source. Never fails: a source error yields an empty
    /// catalog together with the error so the caller can report it.
    pub async fn load(source: &dyn CatalogSource) -> (Self, Option<CatalogError>) {
        match source.load().await {
            Ok(chapters) => {
                let catalog = Self::from_chapters(chapters);
                info!("Catalog ready with {} chapters", catalog.len());
                (catalog, None)
            }
            Err(e) => {
                warn!("Failed to load catalog: {}", e);
                (Self::empty(), Some(e))
            }
        }
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Whether the catalog holds no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Look up a chapter by number.
    pub fn get(&self, number: ChapterNumber) -> Option<&Chapter> {
        self.chapters.get(&number)
    }

    /// Iterate chapters in number order.
    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.values()
    }
}
