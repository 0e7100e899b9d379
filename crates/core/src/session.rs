//! Active session model - a chapter currently assigned to a reader.

use serde::{Deserialize, Serialize};
use crate::chapter::ChapterNumber;
use crate::id::SessionId;
use crate::Time;

/// A chapter taken by a reader and not yet finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    /// Unique identifier
    pub id: SessionId,

    /// Chapter being read
    pub chapter: ChapterNumber,

    /// Session status
    pub status: SessionStatus,

    /// When the chapter was taken
    pub created_at: Time,
}

impl ActiveSession {
    /// Start a new reading session for a chapter.
    pub fn start(chapter: ChapterNumber) -> Self {
        Self {
            id: SessionId::new(),
            chapter,
            status: SessionStatus::Reading,
            created_at: chrono::Utc::now(),
        }
    }

    /// Whether this session still holds its chapter.
    pub fn is_reading(&self) -> bool {
        self.status == SessionStatus::Reading
    }
}

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Chapter is being read
    Reading,
    /// Chapter was finished
    Completed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Reading => write!(f, "reading"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}
