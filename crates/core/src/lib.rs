//! Psalms Together core data models.
//!
//! This crate defines the data structures shared by the catalog loader,
//! the progress tracker and any consumer rendering its state.

#![warn(missing_docs)]

// Identities
mod id;

// Catalog content
mod chapter;

// Reading sessions
mod session;
mod event;

// Re-exports
pub use id::SessionId;
pub use chapter::{Chapter, ChapterNumber, Verses};
pub use session::{ActiveSession, SessionStatus};
pub use event::TrackerEvent;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
