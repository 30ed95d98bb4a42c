use crate::config::ApiConfig;
use crate::model::{Photo, PhotoQuery};
use crate::services::PhotoSearchService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// License types the API treats as Creative Commons
const CREATIVE_COMMONS_LICENSES: &str = "1,2,3,4,5,6";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no API consumer key configured (set PHOTO_SEARCH_API_KEY)")]
    MissingConsumerKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<ApiPhoto>,
}

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<ApiPhoto> for Photo {
    fn from(photo: ApiPhoto) -> Self {
        let created_at = photo
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Photo {
            id: photo.id,
            title: photo.name.unwrap_or_default(),
            image_url: photo.image_url.unwrap_or_default(),
            created_at,
        }
    }
}

/// Client for the 500px-style `/photos/search` endpoint
#[derive(Clone)]
pub struct FiveHundredPxClient {
    base_url: String,
    consumer_key: Option<String>,
    results_per_page: u32,
    image_size: u32,
    client: reqwest::Client,
}

impl FiveHundredPxClient {
    pub fn new(base_url: &str, consumer_key: Option<String>) -> Self {
        let defaults = ApiConfig::default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            consumer_key,
            results_per_page: defaults.results_per_page,
            image_size: defaults.image_size,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            results_per_page: config.results_per_page,
            image_size: config.image_size,
            ..Self::new(&config.base_url, config.resolved_consumer_key())
        }
    }

    pub fn has_consumer_key(&self) -> bool {
        self.consumer_key.is_some()
    }

    pub fn search_url(&self) -> String {
        format!("{}/photos/search", self.base_url)
    }

    /// Query string parameters for `query`
    pub fn query_params(&self, query: &PhotoQuery) -> Result<Vec<(&'static str, String)>, ApiError> {
        let consumer_key = self
            .consumer_key
            .clone()
            .ok_or(ApiError::MissingConsumerKey)?;

        let mut params = vec![
            ("term", query.text.clone()),
            ("consumer_key", consumer_key),
            ("rpp", self.results_per_page.to_string()),
            ("image_size", self.image_size.to_string()),
        ];

        if query.creative_commons_only {
            params.push(("license_type", CREATIVE_COMMONS_LICENSES.to_string()));
        }

        Ok(params)
    }

    pub async fn search(&self, query: &PhotoQuery) -> Result<Vec<Photo>, ApiError> {
        let params = self.query_params(query)?;
        debug!(target: "api", "GET {} term={:?}", self.search_url(), query.text);

        let response = self
            .client
            .get(self.search_url())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        let photos = decode_photos(&body)?;
        let total = photos.len();
        let photos = apply_date_filter(photos, query);
        info!(
            target: "api",
            "API returned {} photos ({} after date filter)",
            total,
            photos.len()
        );
        Ok(photos)
    }
}

#[async_trait]
impl PhotoSearchService for FiveHundredPxClient {
    async fn find_photos(&self, query: &PhotoQuery) -> anyhow::Result<Vec<Photo>> {
        Ok(self.search(query).await?)
    }
}

/// Decode a `/photos/search` response body
pub fn decode_photos(body: &str) -> Result<Vec<Photo>, ApiError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.photos.into_iter().map(Photo::from).collect())
}

/// Drop photos outside the query's upload date range, keeping service order.
/// The API has no upload date parameter, so this happens client side.
pub fn apply_date_filter(photos: Vec<Photo>, query: &PhotoQuery) -> Vec<Photo> {
    photos
        .into_iter()
        .filter(|photo| query.accepts_upload_date(photo.created_at))
        .collect()
}
