pub mod photo_search_service;

pub use photo_search_service::PhotoSearchService;
