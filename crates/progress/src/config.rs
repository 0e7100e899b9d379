//! Tracker configuration.

use std::time::Duration;

/// Default length of the drawing animation.
pub const DEFAULT_DRAW_DELAY: Duration = Duration::from_millis(800);

/// Chapter count used when the catalog has no records.
pub const DEFAULT_TOTAL_CHAPTERS: usize = 150;

/// Configuration for the chapter tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Pause between starting a draw and picking the chapter
    pub draw_delay: Duration,
    /// Chapter count when the catalog is empty or failed to load
    pub default_total_chapters: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            draw_delay: DEFAULT_DRAW_DELAY,
            default_total_chapters: DEFAULT_TOTAL_CHAPTERS,
        }
    }
}
