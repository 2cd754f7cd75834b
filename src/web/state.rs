use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::analysis::{GlobalReport, ReportOptions, VideoReport};
use crate::client::AnalysisClient;
use crate::config::WebConfig;

/// A view that finished computing and was applied, pushed to SSE listeners.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "report", rename_all = "snake_case")]
pub enum ViewUpdate {
    Global(GlobalReport),
    Video(VideoReport),
}

impl ViewUpdate {
    pub fn event_name(&self) -> &'static str {
        match self {
            ViewUpdate::Global(_) => "global",
            ViewUpdate::Video(_) => "video",
        }
    }
}

/// Handed out before a view starts fetching; only the newest ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Holds the currently displayed snapshot of one view. Results of requests
/// superseded by a newer `begin()` are dropped.
pub struct ViewSlot<T> {
    generation: AtomicU64,
    current: RwLock<Option<T>>,
}

impl<T: Clone> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns false, leaving the slot untouched, if a newer ticket exists.
    pub async fn apply(&self, ticket: Ticket, view: T) -> bool {
        let mut current = self.current.write().await;
        if self.generation.load(Ordering::SeqCst) != ticket.0 {
            return false;
        }
        *current = Some(view);
        true
    }

    pub async fn current(&self) -> Option<T> {
        self.current.read().await.clone()
    }
}

impl<T: Clone> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub client: AnalysisClient,
    pub tx: broadcast::Sender<ViewUpdate>,
    pub global: Arc<ViewSlot<GlobalReport>>,
    pub video: Arc<ViewSlot<VideoReport>>,
    pub page_size: usize,
    pub top_n: usize,
}

impl AppState {
    pub fn new(client: AnalysisClient, config: &WebConfig) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            client,
            tx,
            global: Arc::new(ViewSlot::new()),
            video: Arc::new(ViewSlot::new()),
            page_size: config.page_size.max(1),
            top_n: config.top_n,
        }
    }

    pub fn report_options(&self, page: usize, page_size: Option<usize>) -> ReportOptions {
        ReportOptions {
            page_size: page_size.unwrap_or(self.page_size).clamp(1, 100),
            page,
            top_n: self.top_n,
        }
    }

    pub async fn publish_global(&self, ticket: Ticket, report: GlobalReport) {
        if self.global.apply(ticket, report.clone()).await {
            self.broadcast(ViewUpdate::Global(report));
        } else {
            debug!("Dropping superseded global view");
        }
    }

    pub async fn publish_video(&self, ticket: Ticket, report: VideoReport) {
        if self.video.apply(ticket, report.clone()).await {
            self.broadcast(ViewUpdate::Video(report));
        } else {
            debug!("Dropping superseded view for video {}", report.video_id);
        }
    }

    fn broadcast(&self, update: ViewUpdate) {
        // No subscribers is the normal case when no dashboard is open.
        let _ = self.tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn newest_ticket_wins() {
        let slot: ViewSlot<&str> = ViewSlot::new();
        let stale = slot.begin();
        let fresh = slot.begin();

        assert!(slot.apply(fresh, "fresh").await);
        assert!(!slot.apply(stale, "stale").await);
        assert_eq!(slot.current().await, Some("fresh"));
    }

    #[tokio::test]
    async fn stale_result_is_dropped_even_if_it_lands_first() {
        let slot: ViewSlot<u32> = ViewSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(!slot.apply(first, 1).await);
        assert_eq!(slot.current().await, None);
        assert!(slot.apply(second, 2).await);
        assert_eq!(slot.current().await, Some(2));
    }

    #[tokio::test]
    async fn only_applied_views_are_broadcast() {
        let client = AnalysisClient::new(&Default::default()).unwrap();
        let state = AppState::new(client, &WebConfig::default());
        let mut rx = state.tx.subscribe();

        let stale = state.global.begin();
        let fresh = state.global.begin();
        state.publish_global(fresh, GlobalReport::build(&[], &[])).await;
        state.publish_global(stale, GlobalReport::build(&[], &[])).await;

        assert!(matches!(rx.try_recv(), Ok(ViewUpdate::Global(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn page_size_is_clamped() {
        let client = AnalysisClient::new(&Default::default()).unwrap();
        let state = AppState::new(client, &WebConfig::default());
        assert_eq!(state.report_options(1, Some(0)).page_size, 1);
        assert_eq!(state.report_options(1, Some(500)).page_size, 100);
        assert_eq!(state.report_options(2, None).page_size, 10);
    }
}
