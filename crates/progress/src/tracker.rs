//! Chapter tracking state machine.
//!
//! A chapter is *available* while it is neither in the read set nor held by
//! a session in the `reading` status. Draws pick from the available set,
//! confirmation turns the selection into a session, and completion retires
//! the chapter. When the read set reaches the chapter count it is emptied and
//! the cycle counter advances in the same step.

use std::collections::BTreeSet;
use chrono::Utc;
use psalms_catalog::{Catalog, CatalogError};
use psalms_core::{
    ActiveSession, Chapter, ChapterNumber, SessionId, SessionStatus, Time, TrackerEvent,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::picker::{ChapterPicker, RandomPicker};

/// Capacity of the change notification channel.
const EVENT_CAPACITY: usize = 64;

/// Error conditions the tracker reports.
///
/// The first two are held in the tracker's error field; consumers read and
/// clear them. `ChapterUnavailable` is only returned by strict selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// A draw found every chapter read or being read
    #[error("no chapters available to draw")]
    NoChaptersAvailable,

    /// The catalog could not be loaded at startup
    #[error("could not load the chapter catalog: {0}")]
    CatalogUnavailable(String),

    /// A chapter outside the available set was requested
    #[error("chapter {0} is not available")]
    ChapterUnavailable(ChapterNumber),
}

impl TrackerError {
    /// The message the Hebrew interface shows for this error, where it has one.
    pub fn hebrew_message(&self) -> Option<&'static str> {
        match self {
            Self::NoChaptersAvailable => Some("שגיאה בטעינת הפרק"),
            Self::CatalogUnavailable(_) => Some("לא ניתן לטעון את קובץ התהילים המקומי"),
            Self::ChapterUnavailable(_) => None,
        }
    }
}

/// Handle for a draw in flight, returned by [`ChapterTracker::begin_draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a draw only completes when its ticket is passed to finish_draw"]
pub struct DrawTicket {
    generation: u64,
}

/// How a draw ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A chapter was placed in the selection slot
    Drawn(ChapterNumber),
    /// Nothing was available; the error field is set
    NothingAvailable,
    /// A newer draw started before this one finished; state was left alone
    Superseded,
}

/// Result of completing a session.
#[derive(Debug, Clone)]
pub struct Completion {
    /// The removed session, with status `completed`
    pub session: ActiveSession,
    /// Whether this completion closed a full cycle
    pub cycle_completed: bool,
}

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: Time,
    /// Chapters per cycle
    pub total_chapters: usize,
    /// Chapters read in the current cycle
    pub read_count: usize,
    /// Chapters not yet read in the current cycle
    pub unread_count: usize,
    /// Sessions currently reading
    pub active_count: usize,
    /// Chapters that can be drawn right now
    pub available_count: usize,
    /// Full read-throughs so far
    pub completed_cycles: u32,
    /// Chapter awaiting confirmation
    pub selected_chapter: Option<ChapterNumber>,
    /// Whether a draw is in flight
    pub loading: bool,
    /// Current error message
    pub error: Option<String>,
}

/// Tracks which chapters are being read and which are done.
pub struct ChapterTracker {
    catalog: Catalog,
    config: TrackerConfig,
    total_chapters: usize,
    read_chapters: BTreeSet<ChapterNumber>,
    active_sessions: Vec<ActiveSession>,
    completed_cycles: u32,
    selected_chapter: Option<ChapterNumber>,
    error: Option<TrackerError>,
    loading: bool,
    draw_generation: u64,
    picker: Box<dyn ChapterPicker>,
    events: broadcast::Sender<TrackerEvent>,
}

impl ChapterTracker {
    /// Create a tracker over a loaded catalog.
    pub fn new(catalog: Catalog) -> Self {
        let config = TrackerConfig::default();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            total_chapters: resolve_total(&catalog, &config),
            catalog,
            config,
            read_chapters: BTreeSet::new(),
            active_sessions: Vec::new(),
            completed_cycles: 0,
            selected_chapter: None,
            error: None,
            loading: false,
            draw_generation: 0,
            picker: Box::new(RandomPicker::new()),
            events,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.total_chapters = resolve_total(&self.catalog, &config);
        self.config = config;
        self
    }

    /// Set the chapter picking strategy.
    pub fn with_picker(mut self, picker: Box<dyn ChapterPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Record that the catalog failed to load.
    pub fn with_catalog_error(mut self, error: &CatalogError) -> Self {
        warn!("Tracker starting without catalog content: {}", error);
        self.error = Some(TrackerError::CatalogUnavailable(error.to_string()));
        self
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events.subscribe()
    }

    // === Draw ===

    /// Start a draw: clear the error, clear the selection, set loading.
    ///
    /// Starting a draw while another is in flight supersedes the older one.
    pub fn begin_draw(&mut self) -> DrawTicket {
        self.error = None;
        self.selected_chapter = None;
        self.loading = true;
        self.draw_generation += 1;

        debug!("Draw {} started", self.draw_generation);
        self.publish(TrackerEvent::DrawStarted);

        DrawTicket {
            generation: self.draw_generation,
        }
    }

    /// Finish a draw: pick from the available set, then clear loading.
    pub fn finish_draw(&mut self, ticket: DrawTicket) -> DrawOutcome {
        if ticket.generation != self.draw_generation {
            debug!(
                "Draw {} superseded by draw {}",
                ticket.generation, self.draw_generation
            );
            return DrawOutcome::Superseded;
        }

        let available = self.available_chapters();
        match self.picker.pick(&available) {
            Some(chapter) => {
                self.selected_chapter = Some(chapter);
                self.loading = false;
                debug!("Drew chapter {}", chapter);
                self.publish(TrackerEvent::ChapterDrawn { chapter });
                DrawOutcome::Drawn(chapter)
            }
            None => {
                self.error = Some(TrackerError::NoChaptersAvailable);
                self.loading = false;
                debug!("Draw found no available chapters");
                self.publish(TrackerEvent::DrawFailed);
                DrawOutcome::NothingAvailable
            }
        }
    }

    /// Draw without the animation delay.
    pub fn draw_now(&mut self) -> DrawOutcome {
        let ticket = self.begin_draw();
        self.finish_draw(ticket)
    }

    // === Selection ===

    /// Put a chapter in the selection slot and clear the error.
    ///
    /// The chapter is not checked against the available set; see
    /// [`Self::select_available_chapter`] for the checked variant.
    pub fn select_chapter(&mut self, chapter: ChapterNumber) {
        if !self.is_available(chapter) {
            warn!("Selecting chapter {} which is not available", chapter);
        }

        self.selected_chapter = Some(chapter);
        self.error = None;
        self.publish(TrackerEvent::ChapterSelected { chapter });
    }

    /// Select a chapter only if it is in the available set.
    pub fn select_available_chapter(&mut self, chapter: ChapterNumber) -> Result<(), TrackerError> {
        if !self.is_available(chapter) {
            return Err(TrackerError::ChapterUnavailable(chapter));
        }
        self.select_chapter(chapter);
        Ok(())
    }

    /// Drop the pending selection without confirming it.
    pub fn clear_selection(&mut self) {
        if self.selected_chapter.take().is_some() {
            self.publish(TrackerEvent::SelectionCleared);
        }
    }

    /// Turn the pending selection into a reading session.
    ///
    /// Returns `None` and changes nothing when the slot is empty.
    pub fn confirm_selected_chapter(&mut self) -> Option<SessionId> {
        let chapter = self.selected_chapter.take()?;

        let session = ActiveSession::start(chapter);
        let id = session.id;
        self.active_sessions.push(session);

        info!("Chapter {} taken for reading (session {})", chapter, id);
        self.publish(TrackerEvent::SessionStarted { session: id, chapter });
        Some(id)
    }

    // === Sessions ===

    /// Complete a session: retire its chapter and remove the session.
    ///
    /// Returns `None` and changes nothing when the id is unknown.
    pub fn complete_chapter(&mut self, id: &SessionId) -> Option<Completion> {
        let Some(position) = self.active_sessions.iter().position(|s| s.id == *id) else {
            debug!("No active session {}", id);
            return None;
        };

        let mut session = self.active_sessions.remove(position);
        session.status = SessionStatus::Completed;
        self.read_chapters.insert(session.chapter);

        let cycle_completed = self.is_cycle_complete();
        if cycle_completed {
            self.completed_cycles += 1;
            self.read_chapters.clear();
        }

        info!("Chapter {} completed (session {})", session.chapter, session.id);
        self.publish(TrackerEvent::SessionCompleted {
            session: session.id,
            chapter: session.chapter,
        });

        if cycle_completed {
            info!("Cycle {} completed", self.completed_cycles);
            self.publish(TrackerEvent::CycleCompleted {
                cycles: self.completed_cycles,
            });
        }

        Some(Completion {
            session,
            cycle_completed,
        })
    }

    /// Put a session back into the reading status.
    ///
    /// Completion removes sessions, so every listed session is normally
    /// already reading and this changes nothing. An event is published only
    /// when the status actually changes. Returns `false` when the id is unknown.
    pub fn resume_session(&mut self, id: &SessionId) -> bool {
        let Some(session) = self.active_sessions.iter_mut().find(|s| s.id == *id) else {
            return false;
        };

        if session.status != SessionStatus::Reading {
            session.status = SessionStatus::Reading;
            self.publish(TrackerEvent::SessionResumed { session: *id });
        }
        true
    }

    // === Errors ===

    /// Clear the error message.
    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.publish(TrackerEvent::ErrorCleared);
        }
    }

    // === Queries ===

    /// Chapters per cycle.
    pub fn total_chapters(&self) -> usize {
        self.total_chapters
    }

    /// Chapters not yet read in this cycle.
    pub fn unread_count(&self) -> usize {
        self.total_chapters - self.read_chapters.len()
    }

    /// Chapters read in this cycle. Resets to zero with every cycle.
    pub fn read_count(&self) -> usize {
        self.read_chapters.len()
    }

    /// Sessions currently in the reading status.
    pub fn active_count(&self) -> usize {
        self.active_sessions.iter().filter(|s| s.is_reading()).count()
    }

    /// Chapters that may be drawn, in ascending order.
    pub fn available_chapters(&self) -> Vec<ChapterNumber> {
        (1..=self.total_chapters as ChapterNumber)
            .filter(|&n| self.is_available(n))
            .collect()
    }

    /// Whether a chapter may be drawn.
    pub fn is_available(&self, chapter: ChapterNumber) -> bool {
        chapter >= 1
            && (chapter as usize) <= self.total_chapters
            && !self.read_chapters.contains(&chapter)
            && !self
                .active_sessions
                .iter()
                .any(|s| s.chapter == chapter && s.is_reading())
    }

    /// Full read-throughs completed.
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Current error, if any.
    pub fn error(&self) -> Option<&TrackerError> {
        self.error.as_ref()
    }

    /// Whether a draw is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Chapter awaiting confirmation.
    pub fn selected_chapter(&self) -> Option<ChapterNumber> {
        self.selected_chapter
    }

    /// Chapters read in this cycle.
    pub fn read_chapters(&self) -> &BTreeSet<ChapterNumber> {
        &self.read_chapters
    }

    /// Active sessions in the order they were confirmed.
    pub fn active_sessions(&self) -> &[ActiveSession] {
        &self.active_sessions
    }

    /// Look up an active session.
    pub fn session(&self, id: &SessionId) -> Option<&ActiveSession> {
        self.active_sessions.iter().find(|s| s.id == *id)
    }

    /// Catalog content for a chapter. A miss is a display case, not an error.
    pub fn chapter(&self, number: ChapterNumber) -> Option<&Chapter> {
        self.catalog.get(number)
    }

    /// The catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Take a progress snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            timestamp: Utc::now(),
            total_chapters: self.total_chapters,
            read_count: self.read_count(),
            unread_count: self.unread_count(),
            active_count: self.active_count(),
            available_count: self.available_chapters().len(),
            completed_cycles: self.completed_cycles,
            selected_chapter: self.selected_chapter,
            loading: self.loading,
            error: self.error.as_ref().map(ToString::to_string),
        }
    }

    fn is_cycle_complete(&self) -> bool {
        self.read_chapters.len() >= self.total_chapters
    }

    fn publish(&self, event: TrackerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

fn resolve_total(catalog: &Catalog, config: &TrackerConfig) -> usize {
    if catalog.is_empty() {
        config.default_total_chapters
    } else {
        catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psalms_core::Verses;

    /// Always picks the lowest available chapter.
    struct LowestPicker;

    impl ChapterPicker for LowestPicker {
        fn pick(&mut self, available: &[ChapterNumber]) -> Option<ChapterNumber> {
            available.first().copied()
        }
    }

    fn create_test_catalog(size: ChapterNumber) -> Catalog {
        Catalog::from_chapters((1..=size).map(|number| Chapter {
            number,
            hebrew_number: None,
            name: format!("Psalm {}", number),
            verses: Verses::Many(vec![format!("verse {}", number)]),
        }))
    }

    fn create_test_tracker(size: ChapterNumber) -> ChapterTracker {
        ChapterTracker::new(create_test_catalog(size)).with_picker(Box::new(LowestPicker))
    }

    fn take(tracker: &mut ChapterTracker, chapter: ChapterNumber) -> SessionId {
        tracker.select_chapter(chapter);
        tracker.confirm_selected_chapter().unwrap()
    }

    #[test]
    fn test_new_tracker_is_empty() {
        let tracker = create_test_tracker(3);

        assert_eq!(tracker.total_chapters(), 3);
        assert_eq!(tracker.unread_count(), 3);
        assert_eq!(tracker.read_count(), 0);
        assert_eq!(tracker.active_count(), 0);
        assert_eq!(tracker.completed_cycles(), 0);
        assert_eq!(tracker.available_chapters(), vec![1, 2, 3]);
        assert!(tracker.error().is_none());
        assert!(!tracker.is_loading());
        assert!(tracker.selected_chapter().is_none());
    }

    #[test]
    fn test_empty_catalog_falls_back_to_default_total() {
        let tracker = ChapterTracker::new(Catalog::empty());
        assert_eq!(tracker.total_chapters(), 150);
        assert_eq!(tracker.available_chapters().len(), 150);
        assert!(tracker.chapter(1).is_none());

        let tracker = ChapterTracker::new(Catalog::empty()).with_config(TrackerConfig {
            default_total_chapters: 10,
            ..Default::default()
        });
        assert_eq!(tracker.total_chapters(), 10);
    }

    #[test]
    fn test_catalog_error_is_reported_and_cleared_by_draw() {
        let error = CatalogError::NotAnArray;
        let mut tracker = ChapterTracker::new(Catalog::empty()).with_catalog_error(&error);

        assert!(matches!(tracker.error(), Some(TrackerError::CatalogUnavailable(_))));
        assert_eq!(tracker.total_chapters(), 150);

        assert!(matches!(tracker.draw_now(), DrawOutcome::Drawn(_)));
        assert!(tracker.error().is_none());
    }

    #[test]
    fn test_begin_draw_resets_state_and_sets_loading() {
        let mut tracker = create_test_tracker(3);
        tracker.select_chapter(2);

        let ticket = tracker.begin_draw();
        assert!(tracker.is_loading());
        assert!(tracker.selected_chapter().is_none());
        assert!(tracker.error().is_none());

        assert_eq!(tracker.finish_draw(ticket), DrawOutcome::Drawn(1));
        assert!(!tracker.is_loading());
        assert_eq!(tracker.selected_chapter(), Some(1));
    }

    #[test]
    fn test_draw_with_nothing_available() {
        let mut tracker = create_test_tracker(2);
        take(&mut tracker, 1);
        take(&mut tracker, 2);

        assert_eq!(tracker.draw_now(), DrawOutcome::NothingAvailable);
        assert_eq!(tracker.error(), Some(&TrackerError::NoChaptersAvailable));
        assert!(!tracker.is_loading());
        assert!(tracker.selected_chapter().is_none());
    }

    #[test]
    fn test_newer_draw_supersedes_older() {
        let mut tracker = create_test_tracker(3);

        let first = tracker.begin_draw();
        let second = tracker.begin_draw();

        assert_eq!(tracker.finish_draw(first), DrawOutcome::Superseded);
        assert!(tracker.is_loading());
        assert!(tracker.selected_chapter().is_none());

        assert_eq!(tracker.finish_draw(second), DrawOutcome::Drawn(1));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_confirmed_chapter_leaves_available_set() {
        let mut tracker = create_test_tracker(3);

        assert_eq!(tracker.draw_now(), DrawOutcome::Drawn(1));
        let id = tracker.confirm_selected_chapter().unwrap();

        assert_eq!(tracker.available_chapters(), vec![2, 3]);
        assert_eq!(tracker.active_count(), 1);
        assert!(tracker.selected_chapter().is_none());

        let session = tracker.session(&id).unwrap();
        assert_eq!(session.chapter, 1);
        assert_eq!(session.status, SessionStatus::Reading);
    }

    #[test]
    fn test_confirm_with_empty_slot_is_noop() {
        let mut tracker = create_test_tracker(3);
        let before = tracker.snapshot();

        assert!(tracker.confirm_selected_chapter().is_none());

        let after = tracker.snapshot();
        assert!(tracker.active_sessions().is_empty());
        assert_eq!(after.available_count, before.available_count);
        assert_eq!(after.selected_chapter, None);
    }

    #[test]
    fn test_complete_unknown_session_is_noop() {
        let mut tracker = create_test_tracker(3);
        take(&mut tracker, 2);

        assert!(tracker.complete_chapter(&SessionId::new()).is_none());
        assert_eq!(tracker.active_sessions().len(), 1);
        assert_eq!(tracker.read_count(), 0);
        assert_eq!(tracker.available_chapters(), vec![1, 3]);
    }

    #[test]
    fn test_complete_retires_chapter_and_removes_session() {
        let mut tracker = create_test_tracker(3);
        let id = take(&mut tracker, 2);

        let completion = tracker.complete_chapter(&id).unwrap();
        assert_eq!(completion.session.chapter, 2);
        assert_eq!(completion.session.status, SessionStatus::Completed);
        assert!(!completion.cycle_completed);

        assert!(tracker.active_sessions().is_empty());
        assert_eq!(tracker.read_count(), 1);
        assert_eq!(tracker.unread_count(), 2);
        assert_eq!(tracker.available_chapters(), vec![1, 3]);

        // Completing twice does nothing
        assert!(tracker.complete_chapter(&id).is_none());
    }

    #[test]
    fn test_full_cycle_resets_read_set() {
        let mut tracker = create_test_tracker(3);

        for _ in 0..2 {
            tracker.draw_now();
            let id = tracker.confirm_selected_chapter().unwrap();
            assert!(!tracker.complete_chapter(&id).unwrap().cycle_completed);
        }
        assert_eq!(tracker.read_count(), 2);
        assert_eq!(tracker.available_chapters(), vec![3]);

        tracker.draw_now();
        let id = tracker.confirm_selected_chapter().unwrap();
        let completion = tracker.complete_chapter(&id).unwrap();

        assert!(completion.cycle_completed);
        assert_eq!(tracker.completed_cycles(), 1);
        assert_eq!(tracker.read_count(), 0);
        assert!(tracker.read_chapters().is_empty());
        assert_eq!(tracker.available_chapters(), vec![1, 2, 3]);
    }

    #[test]
    fn test_cycle_ignores_sessions_still_reading() {
        let mut tracker = create_test_tracker(2);
        let first = take(&mut tracker, 1);
        let second = take(&mut tracker, 2);

        tracker.complete_chapter(&first);
        assert_eq!(tracker.completed_cycles(), 0);

        tracker.complete_chapter(&second);
        assert_eq!(tracker.completed_cycles(), 1);
        assert_eq!(tracker.read_count(), 0);
    }

    #[test]
    fn test_select_is_permissive() {
        let mut tracker = create_test_tracker(3);
        take(&mut tracker, 1);

        // Already reading
        tracker.select_chapter(1);
        assert_eq!(tracker.selected_chapter(), Some(1));
        let id = tracker.confirm_selected_chapter().unwrap();
        assert_eq!(tracker.session(&id).unwrap().chapter, 1);
        assert_eq!(tracker.active_count(), 2);

        // Out of range
        tracker.select_chapter(99);
        assert_eq!(tracker.selected_chapter(), Some(99));
    }

    #[test]
    fn test_select_clears_error() {
        let mut tracker = create_test_tracker(1);
        take(&mut tracker, 1);
        tracker.draw_now();
        assert!(tracker.error().is_some());

        tracker.select_chapter(1);
        assert!(tracker.error().is_none());
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_select_available_rejects_taken_chapters() {
        let mut tracker = create_test_tracker(3);
        take(&mut tracker, 2);

        assert_eq!(
            tracker.select_available_chapter(2),
            Err(TrackerError::ChapterUnavailable(2))
        );
        assert_eq!(
            tracker.select_available_chapter(0),
            Err(TrackerError::ChapterUnavailable(0))
        );
        assert_eq!(
            tracker.select_available_chapter(4),
            Err(TrackerError::ChapterUnavailable(4))
        );
        assert!(tracker.selected_chapter().is_none());

        assert!(tracker.select_available_chapter(3).is_ok());
        assert_eq!(tracker.selected_chapter(), Some(3));
    }

    #[test]
    fn test_select_then_confirm_round_trip() {
        let mut tracker = create_test_tracker(150);

        tracker.select_chapter(119);
        let id = tracker.confirm_selected_chapter().unwrap();

        assert_eq!(tracker.active_sessions().len(), 1);
        let session = &tracker.active_sessions()[0];
        assert_eq!(session.id, id);
        assert_eq!(session.chapter, 119);
        assert_eq!(session.status, SessionStatus::Reading);
        assert!(tracker.selected_chapter().is_none());
    }

    #[test]
    fn test_clear_selection() {
        let mut tracker = create_test_tracker(3);
        tracker.draw_now();
        tracker.clear_selection();

        assert!(tracker.selected_chapter().is_none());
        assert!(tracker.confirm_selected_chapter().is_none());
        assert_eq!(tracker.available_chapters(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sessions_keep_confirmation_order() {
        let mut tracker = create_test_tracker(5);
        take(&mut tracker, 4);
        take(&mut tracker, 1);
        take(&mut tracker, 3);

        let chapters: Vec<_> = tracker.active_sessions().iter().map(|s| s.chapter).collect();
        assert_eq!(chapters, vec![4, 1, 3]);
    }

    #[test]
    fn test_same_chapter_gets_distinct_session_ids() {
        let mut tracker = create_test_tracker(3);
        let first = take(&mut tracker, 1);
        tracker.complete_chapter(&first);

        tracker.select_chapter(1);
        let second = tracker.confirm_selected_chapter().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_resume_session() {
        let mut tracker = create_test_tracker(3);
        let id = take(&mut tracker, 1);

        assert!(tracker.resume_session(&id));
        assert_eq!(tracker.session(&id).unwrap().status, SessionStatus::Reading);
        assert!(!tracker.resume_session(&SessionId::new()));
    }

    #[test]
    fn test_resume_reading_session_publishes_nothing() {
        let mut tracker = create_test_tracker(3);
        let id = take(&mut tracker, 1);
        let mut events = tracker.subscribe();

        assert!(tracker.resume_session(&id));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_out_of_range_completion_counts_toward_cycle() {
        let mut tracker = create_test_tracker(3);

        for chapter in [99, 1] {
            let id = take(&mut tracker, chapter);
            assert!(!tracker.complete_chapter(&id).unwrap().cycle_completed);
        }
        assert_eq!(tracker.read_count(), 2);
        assert_eq!(tracker.unread_count(), 1);
        assert_eq!(tracker.available_chapters(), vec![2, 3]);

        // Third member closes the cycle even though chapter 3 was never read
        let id = take(&mut tracker, 2);
        let completion = tracker.complete_chapter(&id).unwrap();

        assert!(completion.cycle_completed);
        assert_eq!(tracker.completed_cycles(), 1);
        assert_eq!(tracker.read_count(), 0);
        assert_eq!(tracker.unread_count(), 3);
        assert_eq!(tracker.available_chapters(), vec![1, 2, 3]);

        // The read set never grows past the chapter count
        let id = take(&mut tracker, 98);
        tracker.complete_chapter(&id);
        assert!(tracker.read_count() <= tracker.total_chapters());
        assert_eq!(tracker.read_count(), 1);
    }

    #[test]
    fn test_completing_chapter_taken_twice() {
        let mut tracker = create_test_tracker(3);
        let first = take(&mut tracker, 1);
        // Already being read, taken again through the permissive path
        let second = take(&mut tracker, 1);
        assert_eq!(tracker.active_count(), 2);

        tracker.complete_chapter(&first);
        assert_eq!(tracker.read_count(), 1);
        assert_eq!(tracker.unread_count(), 2);

        // The read set holds the chapter once
        tracker.complete_chapter(&second);
        assert_eq!(tracker.read_count(), 1);
        assert_eq!(tracker.completed_cycles(), 0);
        assert!(tracker.active_sessions().is_empty());
        assert_eq!(tracker.available_chapters(), vec![2, 3]);
    }

    #[test]
    fn test_hebrew_messages() {
        assert_eq!(
            TrackerError::NoChaptersAvailable.hebrew_message(),
            Some("שגיאה בטעינת הפרק")
        );
        assert!(TrackerError::CatalogUnavailable("io".to_string())
            .hebrew_message()
            .is_some());
        assert!(TrackerError::ChapterUnavailable(4).hebrew_message().is_none());
    }

    #[test]
    fn test_clear_error_is_idempotent() {
        let mut tracker = create_test_tracker(3);
        let mut events = tracker.subscribe();

        tracker.clear_error();
        assert!(tracker.error().is_none());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_chapter_lookup_miss_is_none() {
        let mut tracker = create_test_tracker(3);
        let id = take(&mut tracker, 7);

        let session = tracker.session(&id).unwrap();
        assert!(tracker.chapter(session.chapter).is_none());
        assert_eq!(tracker.chapter(2).unwrap().name, "Psalm 2");
    }

    #[test]
    fn test_events_follow_state_changes() {
        let mut tracker = create_test_tracker(1);
        let mut events = tracker.subscribe();

        tracker.draw_now();
        let id = tracker.confirm_selected_chapter().unwrap();
        tracker.complete_chapter(&id);

        assert_eq!(events.try_recv().unwrap(), TrackerEvent::DrawStarted);
        assert_eq!(events.try_recv().unwrap(), TrackerEvent::ChapterDrawn { chapter: 1 });
        assert_eq!(
            events.try_recv().unwrap(),
            TrackerEvent::SessionStarted { session: id, chapter: 1 }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            TrackerEvent::SessionCompleted { session: id, chapter: 1 }
        );
        assert_eq!(events.try_recv().unwrap(), TrackerEvent::CycleCompleted { cycles: 1 });
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_snapshot_counts() {
        let mut tracker = create_test_tracker(4);
        let done = take(&mut tracker, 1);
        tracker.complete_chapter(&done);
        take(&mut tracker, 2);
        tracker.select_chapter(3);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.total_chapters, 4);
        assert_eq!(snapshot.read_count, 1);
        assert_eq!(snapshot.unread_count, 3);
        assert_eq!(snapshot.active_count, 1);
        assert_eq!(snapshot.available_count, 2);
        assert_eq!(snapshot.selected_chapter, Some(3));
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
    }
}
