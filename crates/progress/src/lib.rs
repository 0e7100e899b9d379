//! Reading progress tracking.
//!
//! Chapter drawing, reading sessions, and read-through cycles.

#![warn(missing_docs)]

pub mod config;
pub mod picker;
pub mod tracker;
pub mod shared;

pub use config::TrackerConfig;
pub use picker::{ChapterPicker, RandomPicker};
pub use tracker::{
    ChapterTracker, Completion, DrawOutcome, DrawTicket, ProgressSnapshot, TrackerError,
};
pub use shared::SharedTracker;
