//! Tracker events - one per observable state change.

use serde::{Deserialize, Serialize};
use crate::chapter::ChapterNumber;
use crate::id::SessionId;

/// A change published by the tracker after it mutates its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// A draw started; loading is now set and the selection cleared
    DrawStarted,

    /// A draw finished with a chapter in the selection slot
    ChapterDrawn {
        /// The drawn chapter
        chapter: ChapterNumber,
    },

    /// A draw finished with nothing available
    DrawFailed,

    /// A chapter was placed in the selection slot explicitly
    ChapterSelected {
        /// The selected chapter
        chapter: ChapterNumber,
    },

    /// The selection slot was emptied without confirming
    SelectionCleared,

    /// A selection was confirmed into a reading session
    SessionStarted {
        /// New session
        session: SessionId,
        /// Chapter taken
        chapter: ChapterNumber,
    },

    /// A session was completed and removed
    SessionCompleted {
        /// Removed session
        session: SessionId,
        /// Chapter retired into the read set
        chapter: ChapterNumber,
    },

    /// A session was put back into the reading status
    SessionResumed {
        /// Resumed session
        session: SessionId,
    },

    /// Every chapter was read; the read set was reset
    CycleCompleted {
        /// Total cycles completed so far
        cycles: u32,
    },

    /// The error field was cleared
    ErrorCleared,
}
