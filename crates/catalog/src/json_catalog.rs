//! JSON file catalog source.
//!
//! Reads a single JSON document holding an array of chapter records:
//! `[{"number": 1, "hebrewNumber": "א", "name": "...", "verses": [...]}, ...]`.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use psalms_core::Chapter;
use tokio::fs;
use tracing::debug;
use super::{CatalogError, CatalogSource, Result};

/// File-based JSON catalog source.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    /// Create a source reading from `path`. Nothing is read until [`CatalogSource::load`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonCatalog {
    async fn load(&self) -> Result<Vec<Chapter>> {
        let content = fs::read_to_string(&self.path).await?;
        let json: serde_json::Value = serde_json::from_str(&content)?;

        if !json.is_array() {
            return Err(CatalogError::NotAnArray);
        }

        let chapters: Vec<Chapter> = serde_json::from_value(json)?;
        debug!("Loaded {} chapters from {}", chapters.len(), self.path.display());
        Ok(chapters)
    }
}
