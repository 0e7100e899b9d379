//! Shared tracker handle with the delayed draw.

use std::sync::Arc;
use std::time::Duration;
use psalms_catalog::{Catalog, CatalogSource};
use psalms_core::TrackerEvent;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::tracker::{ChapterTracker, DrawOutcome, DrawTicket};

/// Cloneable handle to one tracker instance.
///
/// Draws hold the lock only to start and to finish; the delay between the
/// two runs on a tokio timer so every other operation stays responsive and
/// observes `loading == true` in the meantime.
#[derive(Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<ChapterTracker>>,
    draw_delay: Duration,
}

impl SharedTracker {
    /// Wrap a tracker.
    pub fn new(tracker: ChapterTracker) -> Self {
        let draw_delay = tracker.config().draw_delay;
        Self {
            inner: Arc::new(Mutex::new(tracker)),
            draw_delay,
        }
    }

    /// Load the catalog from `source` and build a tracker over it.
    ///
    /// A load failure is recorded in the tracker's error field.
    pub async fn load(source: &dyn CatalogSource, config: TrackerConfig) -> Self {
        let (catalog, error) = Catalog::load(source).await;
        let mut tracker = ChapterTracker::new(catalog).with_config(config);
        if let Some(error) = error {
            tracker = tracker.with_catalog_error(&error);
        }
        Self::new(tracker)
    }

    /// Lock the tracker for synchronous operations and reads.
    pub async fn lock(&self) -> MutexGuard<'_, ChapterTracker> {
        self.inner.lock().await
    }

    /// Subscribe to state changes.
    pub async fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.inner.lock().await.subscribe()
    }

    /// Draw a random chapter, waiting out the draw delay.
    pub async fn draw_random_chapter(&self) -> DrawOutcome {
        let ticket = self.inner.lock().await.begin_draw();
        self.finish_after_delay(ticket).await
    }

    /// Draw again after turning down a previous result.
    pub async fn draw_new_chapter(&self) -> DrawOutcome {
        self.draw_random_chapter().await
    }

    /// Start a draw and return once loading is set; the pick happens in a
    /// background task after the draw delay.
    pub async fn start_draw(&self) -> JoinHandle<DrawOutcome> {
        let ticket = self.inner.lock().await.begin_draw();
        let this = self.clone();
        tokio::spawn(async move { this.finish_after_delay(ticket).await })
    }

    async fn finish_after_delay(&self, ticket: DrawTicket) -> DrawOutcome {
        if !self.draw_delay.is_zero() {
            tokio::time::sleep(self.draw_delay).await;
        }
        let outcome = self.inner.lock().await.finish_draw(ticket);
        debug!("Draw finished: {:?}", outcome);
        outcome
    }
}
