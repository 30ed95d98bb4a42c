use tokio::time::{Duration, Instant};

/// A simple debouncer that tracks when an action should be triggered
/// after a period of inactivity.
///
/// Uses tokio's clock so that paused-time tests drive it deterministically.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// The duration to wait after the last event before triggering
    delay: Duration,
    /// When the last event occurred, if a trigger is pending
    last_event: Option<Instant>,
}

impl Debouncer {
    /// Create a new debouncer with the specified delay
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    /// Create a new debouncer with the specified delay in milliseconds
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// Register that an event occurred, restarting the quiet window
    pub fn trigger(&mut self) {
        self.last_event = Some(Instant::now());
    }

    /// Instant at which the pending action becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.last_event.map(|last| last + self.delay)
    }

    /// Check if enough time has passed to execute the debounced action.
    /// Returns true at most once per quiet window.
    pub fn should_execute(&mut self) -> bool {
        match self.deadline() {
            Some(deadline) if Instant::now() >= deadline => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    /// Get the time remaining before the action will trigger
    /// Returns None if no action is pending
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Reset the debouncer, canceling any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
    }

    /// Check if there's a pending action
    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }
}
