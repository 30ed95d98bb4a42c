pub mod api_client;
pub mod config;
pub mod debouncer;
pub mod filters;
pub mod logging;
pub mod model;
pub mod observable;
pub mod services;
pub mod state;
pub mod utils;

pub use api_client::FiveHundredPxClient;
pub use filters::FilterSettings;
pub use model::{DateFilter, Photo, PhotoQuery};
pub use services::PhotoSearchService;
pub use state::{scheduler, SearchController, SearchEvent, SearchState};
