//! Configuration module
//!
//! Settings for the photo API, search timing and logging, loaded
//! from a TOML file in the user's config directory.

pub mod config;

pub use config::{ApiConfig, Config, LoggingConfig, SearchConfig};
