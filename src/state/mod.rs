//! Search state and the components that drive it
//!
//! The controller owns a single `SearchState` store. The scheduler
//! watches it together with the filter settings and fires debounced
//! triggers back into the controller.

pub mod controller;
pub mod events;
pub mod scheduler;
pub mod search_state;

pub use controller::{SearchController, SEARCH_FAILED_MESSAGE};
pub use events::SearchEvent;
pub use scheduler::SchedulerHandle;
pub use search_state::SearchState;
