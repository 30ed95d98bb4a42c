//! Search controller: turns debounced triggers into service calls and
//! publishes the outcome.

use crate::config::SearchConfig;
use crate::filters::FilterSettings;
use crate::model::{Photo, PhotoQuery};
use crate::observable::Observable;
use crate::services::PhotoSearchService;
use crate::state::events::SearchEvent;
use crate::state::search_state::SearchState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// The only message a failed search ever shows
pub const SEARCH_FAILED_MESSAGE: &str = "There was an API issue. Sad face :-(";

const EVENT_CAPACITY: usize = 64;

pub struct SearchController {
    state: Observable<SearchState>,
    filters: Arc<FilterSettings>,
    service: Arc<dyn PhotoSearchService>,
    config: SearchConfig,
    events: broadcast::Sender<SearchEvent>,
}

impl SearchController {
    pub fn new(
        service: Arc<dyn PhotoSearchService>,
        filters: Arc<FilterSettings>,
        config: SearchConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Observable::new(SearchState::with_query(config.initial_query.clone())),
            filters,
            service,
            config,
            events,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SearchState {
        self.state.get()
    }

    /// Change stream over the whole state
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Dispatch/completion events
    pub fn events(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    pub fn filters(&self) -> &Arc<FilterSettings> {
        &self.filters
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.config.debounce_ms)
    }

    pub fn query_text(&self) -> String {
        self.state.with(|s| s.query_text.clone())
    }

    pub fn is_valid(&self) -> bool {
        self.state.with(|s| s.is_valid)
    }

    pub fn in_progress(&self) -> bool {
        self.state.with(|s| s.in_progress)
    }

    pub fn results(&self) -> Vec<Photo> {
        self.state.with(|s| s.results.clone())
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.with(|s| s.last_error.clone())
    }

    /// Update the query text and its validity. Never starts a search by
    /// itself. Every call notifies, so re-entering the same text re-arms
    /// the text debounce.
    pub fn set_query_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.update(|state| {
            state.set_query_text(text);
            true
        });
    }

    /// Snapshot the current text and filter values
    pub fn build_query(&self) -> PhotoQuery {
        PhotoQuery {
            text: self.query_text(),
            creative_commons_only: self.filters.creative_commons_only().get(),
            date_filter: self.filters.date_filter().get(),
            min_date: self.filters.min_upload_date().get(),
            max_date: self.filters.max_upload_date().get(),
        }
    }

    /// Start a search for the current text and filters.
    ///
    /// Validity is enforced where text triggers are armed, so a filter
    /// change searches whatever the text is. Returns the dispatch id. Must
    /// be called from within a tokio runtime.
    pub fn on_debounced_trigger(self: &Arc<Self>) -> u64 {
        let query = self.build_query();

        // Id bump and in_progress go through the same store write as completions
        let mut id = 0;
        self.state.update(|state| {
            state.latest_dispatch += 1;
            state.in_progress = true;
            id = state.latest_dispatch;
            true
        });
        info!(target: "search", "search #{} for {:?}", id, query.text);
        self.emit(SearchEvent::Dispatched {
            id,
            query: query.clone(),
        });

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let result = controller.service.find_photos(&query).await;
            controller.handle_search_completion(id, result);
        });

        id
    }

    /// Publish the outcome of dispatch `id`
    pub fn handle_search_completion(&self, id: u64, result: anyhow::Result<Vec<Photo>>) {
        let discard_stale = self.config.discard_stale_results;
        let count = result.as_ref().map(Vec::len).ok();
        if let Err(err) = &result {
            warn!(target: "search", "search #{} failed: {:#}", id, err);
        }

        // The stale check and the write happen under one store update
        let mut superseded_by = None;
        self.state.update(|state| {
            if discard_stale && id < state.latest_dispatch {
                superseded_by = Some(state.latest_dispatch);
                return false;
            }
            state.in_progress = false;
            match result {
                Ok(photos) => {
                    state.results = photos;
                    state.last_error = None;
                }
                Err(_) => state.last_error = Some(SEARCH_FAILED_MESSAGE.to_string()),
            }
            true
        });

        match (superseded_by, count) {
            (Some(latest), _) => {
                debug!(target: "search", "search #{} superseded by #{}", id, latest);
                self.emit(SearchEvent::Superseded { id, latest });
            }
            (None, Some(count)) => {
                info!(target: "search", "search #{} returned {} photos", id, count);
                self.emit(SearchEvent::Completed { id, count });
            }
            (None, None) => self.emit(SearchEvent::Failed {
                id,
                message: SEARCH_FAILED_MESSAGE.to_string(),
            }),
        }
    }

    fn emit(&self, event: SearchEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DateFilter;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    struct NeverCalled;

    #[async_trait]
    impl PhotoSearchService for NeverCalled {
        async fn find_photos(&self, _query: &PhotoQuery) -> anyhow::Result<Vec<Photo>> {
            anyhow::bail!("not expected")
        }
    }

    fn photo(id: u64) -> Photo {
        Photo {
            id,
            title: format!("photo {id}"),
            image_url: format!("https://img/{id}.jpg"),
            created_at: None,
        }
    }

    fn controller(config: SearchConfig) -> SearchController {
        SearchController::new(Arc::new(NeverCalled), Arc::new(FilterSettings::new()), config)
    }

    #[test]
    fn test_initial_query_from_config() {
        let c = controller(SearchConfig::default());
        assert_eq!(c.query_text(), "Bond");
        assert!(c.is_valid());
        assert!(!c.in_progress());
    }

    #[test]
    fn test_set_query_text_updates_validity() {
        let c = controller(SearchConfig::default());
        c.set_query_text("Bo");
        assert!(!c.is_valid());
        c.set_query_text("Bond");
        assert!(c.is_valid());
    }

    #[test]
    fn test_build_query_reads_current_filters() {
        let c = controller(SearchConfig::default());
        let min: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let max: DateTime<Utc> = "2024-06-30T23:59:59Z".parse().unwrap();
        c.filters().set_creative_commons_only(true);
        c.filters().set_min_upload_date(Some(min));
        c.filters().set_max_upload_date(Some(max));
        c.filters().set_date_filter(DateFilter::UploadedBetween);

        let query = c.build_query();
        assert_eq!(query.text, "Bond");
        assert!(query.creative_commons_only);
        assert_eq!(query.date_filter, DateFilter::UploadedBetween);
        assert_eq!(query.min_date, Some(min));
        assert_eq!(query.max_date, Some(max));
    }

    #[test]
    fn test_completion_older_than_latest_dispatch_is_ignored() {
        let c = controller(SearchConfig::default());
        c.state.update(|s| {
            s.latest_dispatch = 2;
            s.in_progress = true;
            true
        });

        c.handle_search_completion(1, Ok(vec![photo(9)]));
        assert!(c.in_progress());
        assert!(c.results().is_empty());

        c.handle_search_completion(2, Ok(vec![photo(1)]));
        assert!(!c.in_progress());
        assert_eq!(c.results(), vec![photo(1)]);
    }

    #[test]
    fn test_success_replaces_results_and_clears_error() {
        let c = controller(SearchConfig::default());
        c.handle_search_completion(0, Err(anyhow::anyhow!("boom")));
        assert_eq!(c.last_error().as_deref(), Some(SEARCH_FAILED_MESSAGE));

        c.handle_search_completion(0, Ok(vec![photo(3), photo(1), photo(2)]));
        let ids: Vec<u64> = c.results().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(c.last_error(), None);
        assert!(!c.in_progress());
    }

    #[test]
    fn test_failure_keeps_results() {
        let c = controller(SearchConfig::default());
        c.handle_search_completion(0, Ok(vec![photo(1)]));
        c.handle_search_completion(0, Err(anyhow::anyhow!("HTTP 503 with details")));

        assert_eq!(c.results(), vec![photo(1)]);
        assert_eq!(c.last_error().as_deref(), Some(SEARCH_FAILED_MESSAGE));
        assert!(!c.in_progress());
    }
}
