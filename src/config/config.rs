use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.consumer_key`
pub const API_KEY_ENV: &str = "PHOTO_SEARCH_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the photo API, without trailing slash
    pub base_url: String,

    /// Consumer key sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,

    /// Photos requested per search
    pub results_per_page: u32,

    /// Image size code requested from the API
    pub image_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet window before a text or filter change triggers a search
    pub debounce_ms: u64,

    /// Query text the search field starts with
    pub initial_query: String,

    /// Ignore completions from searches that a newer search has superseded
    pub discard_stale_results: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    pub default_filter: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.500px.com/v1".to_string(),
            consumer_key: None,
            results_per_page: 50,
            image_size: 3,
        }
    }
}

impl ApiConfig {
    /// Consumer key from the environment, falling back to the config file
    pub fn resolved_consumer_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.consumer_key.clone())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            initial_query: "Bond".to_string(),
            discard_stale_results: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load config from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("photo-search").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Photo Search Configuration File
# Location: ~/.config/photo-search/config.toml (Linux)
#           ~/Library/Application Support/photo-search/config.toml (macOS)
#           %APPDATA%\photo-search\config.toml (Windows)

[api]
# Base URL of the photo API
base_url = "https://api.500px.com/v1"

# Consumer key for the API. The PHOTO_SEARCH_API_KEY environment
# variable takes precedence when set.
# consumer_key = "your-key-here"

# Number of photos requested per search
results_per_page = 50

# Image size code (see API docs)
image_size = 3

[search]
# Quiet period in milliseconds before typing or a filter change
# starts a search
debounce_ms = 500

# Text the search field starts with
initial_query = "Bond"

# When two searches overlap, ignore the older one if it finishes last
discard_stale_results = true

[logging]
# Log filter used when RUST_LOG is not set, e.g. "debug" or "photo_search=trace"
default_filter = "info"
"#
        .to_string()
    }
}
