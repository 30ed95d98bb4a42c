//! Search lifecycle events

use crate::model::PhotoQuery;

/// Events emitted as searches are dispatched and complete
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A search was sent to the service
    Dispatched { id: u64, query: PhotoQuery },

    /// The service answered and the results were published
    Completed { id: u64, count: usize },

    /// The service failed; `message` is what the UI shows
    Failed { id: u64, message: String },

    /// A completion arrived after a newer search was dispatched and was ignored
    Superseded { id: u64, latest: u64 },
}
