//! Search parameters and result records exchanged with the photo service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters a query must exceed before it is searchable
pub const MIN_QUERY_LENGTH: usize = 3;

/// Returns true when `text` is long enough to search for
pub fn is_valid_query(text: &str) -> bool {
    text.chars().count() > MIN_QUERY_LENGTH
}

/// A photo as returned by the search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub title: String,
    pub image_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// How the upload date restricts a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    /// No restriction on upload date
    #[default]
    Any,
    /// Only photos uploaded inside the min/max range
    UploadedBetween,
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::Any => write!(f, "any"),
            DateFilter::UploadedBetween => write!(f, "uploaded between"),
        }
    }
}

/// Immutable snapshot of everything sent to the search service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoQuery {
    pub text: String,
    pub creative_commons_only: bool,
    pub date_filter: DateFilter,
    pub min_date: Option<DateTime<Utc>>,
    pub max_date: Option<DateTime<Utc>>,
}

impl PhotoQuery {
    /// A plain text query with every filter switched off
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            creative_commons_only: false,
            date_filter: DateFilter::Any,
            min_date: None,
            max_date: None,
        }
    }

    /// Whether a photo uploaded at `created_at` passes the date filter.
    /// Photos without an upload time never pass an active date filter.
    pub fn accepts_upload_date(&self, created_at: Option<DateTime<Utc>>) -> bool {
        if self.date_filter == DateFilter::Any {
            return true;
        }
        let Some(created) = created_at else {
            return false;
        };
        let after_min = self.min_date.map_or(true, |min| created >= min);
        let before_max = self.max_date.map_or(true, |max| created <= max);
        after_min && before_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_query_validity_threshold() {
        assert!(!is_valid_query(""));
        assert!(!is_valid_query("Bo"));
        assert!(!is_valid_query("Bon"));
        assert!(is_valid_query("Bond"));
        assert!(is_valid_query("James Bond"));
    }

    #[test]
    fn test_validity_counts_characters_not_bytes() {
        // 3 characters, 6 bytes
        assert!(!is_valid_query("éèê"));
        assert!(is_valid_query("éèêë"));
    }

    #[test]
    fn test_date_filter_any_accepts_everything() {
        let query = PhotoQuery::text("Bond");
        assert!(query.accepts_upload_date(None));
        assert!(query.accepts_upload_date(Some(Utc::now())));
    }

    #[test]
    fn test_date_filter_range_is_inclusive() {
        let min = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let max = Utc.with_ymd_and_hms(2015, 12, 31, 0, 0, 0).unwrap();
        let query = PhotoQuery {
            date_filter: DateFilter::UploadedBetween,
            min_date: Some(min),
            max_date: Some(max),
            ..PhotoQuery::text("Bond")
        };

        assert!(query.accepts_upload_date(Some(min)));
        assert!(query.accepts_upload_date(Some(max)));
        assert!(!query.accepts_upload_date(Some(max + chrono::Duration::seconds(1))));
        assert!(!query.accepts_upload_date(None));
    }
}
