//! Catalog source abstraction.

use async_trait::async_trait;
use psalms_core::Chapter;

/// Error type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is valid JSON but not a list of chapters
    #[error("catalog document is not an array")]
    NotAnArray,
}

/// A source of chapter records, read once at startup.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every chapter record, in source order.
    async fn load(&self) -> Result<Vec<Chapter>>;
}

/// In-memory catalog source.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    chapters: Vec<Chapter>,
}

impl StaticCatalog {
    /// Serve the given chapters.
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> Result<Vec<Chapter>> {
        Ok(self.chapters.clone())
    }
}
