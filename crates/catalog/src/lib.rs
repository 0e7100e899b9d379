//! Chapter catalog loading for Psalms Together.
//!
//! This crate provides a trait-based catalog source with a JSON file
//! implementation, and the immutable [`Catalog`] the tracker reads from.

#![warn(missing_docs)]

pub mod source;
pub mod json_catalog;
pub mod catalog;

pub use source::{CatalogSource, CatalogError, Result, StaticCatalog};
pub use json_catalog::JsonCatalog;
pub use catalog::Catalog;
