//! Debounced trigger loop
//!
//! Text edits and filter changes each get their own debouncer. A text
//! write only arms its timer while the text is valid; a write of an
//! invalid text disarms it. Rewriting the same text still counts as an
//! edit. When a timer's quiet window elapses the
//! controller is asked to search.

use crate::debouncer::Debouncer;
use crate::state::controller::SearchController;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle to a running scheduler task
pub struct SchedulerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the scheduler and wait for it to exit. Searches already
    /// dispatched still complete.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Start the scheduler on the current tokio runtime
pub fn spawn(controller: Arc<SearchController>) -> SchedulerHandle {
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run(controller, cancel.clone()));
    SchedulerHandle { cancel, task }
}

async fn run(controller: Arc<SearchController>, cancel: CancellationToken) {
    let mut state_rx = controller.subscribe();
    let mut filter_changes = controller.filters().changes();
    let mut text_debounce = Debouncer::new(controller.debounce_delay());
    let mut filter_debounce = Debouncer::new(controller.debounce_delay());

    let mut last_revision = {
        let state = state_rx.borrow_and_update();
        // The seeded query gets searched like any other valid edit
        if state.is_valid {
            text_debounce.trigger();
        }
        state.text_revision
    };

    info!(
        target: "search",
        "scheduler started (debounce={:?})",
        controller.debounce_delay()
    );

    loop {
        let deadline = earliest(text_debounce.deadline(), filter_debounce.deadline());

        tokio::select! {
            _ = cancel.cancelled() => break,

            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let (revision, text, valid) = {
                    let state = state_rx.borrow_and_update();
                    (state.text_revision, state.query_text.clone(), state.is_valid)
                };
                // Dispatch and completion writes leave the revision alone
                if revision == last_revision {
                    continue;
                }
                last_revision = revision;
                if valid {
                    debug!(target: "search", "query text set to {:?}, debouncing", text);
                    text_debounce.trigger();
                } else {
                    debug!(target: "search", "query text {:?} too short", text);
                    text_debounce.reset();
                }
            }

            changed = filter_changes.changed() => {
                if changed.is_err() {
                    break;
                }
                debug!(target: "search", "filters changed, debouncing");
                filter_debounce.trigger();
            }

            _ = sleep_until(deadline) => {
                if text_debounce.should_execute() {
                    debug!(target: "search", "text debounce elapsed");
                    controller.on_debounced_trigger();
                }
                if filter_debounce.should_execute() {
                    debug!(target: "search", "filter debounce elapsed");
                    controller.on_debounced_trigger();
                }
            }
        }
    }

    info!(target: "search", "scheduler stopped");
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_earliest() {
        let now = Instant::now();
        let later = now + Duration::from_millis(10);
        assert_eq!(earliest(None, None), None);
        assert_eq!(earliest(Some(later), None), Some(later));
        assert_eq!(earliest(None, Some(now)), Some(now));
        assert_eq!(earliest(Some(later), Some(now)), Some(now));
    }
}
