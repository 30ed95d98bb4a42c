//! Filter settings edited alongside the query text

use crate::model::DateFilter;
use crate::observable::Observable;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

/// The four search filters, each independently observable
#[derive(Debug, Default)]
pub struct FilterSettings {
    creative_commons_only: Observable<bool>,
    date_filter: Observable<DateFilter>,
    min_upload_date: Observable<Option<DateTime<Utc>>>,
    max_upload_date: Observable<Option<DateTime<Utc>>>,
}

impl FilterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creative_commons_only(&self) -> &Observable<bool> {
        &self.creative_commons_only
    }

    pub fn date_filter(&self) -> &Observable<DateFilter> {
        &self.date_filter
    }

    pub fn min_upload_date(&self) -> &Observable<Option<DateTime<Utc>>> {
        &self.min_upload_date
    }

    pub fn max_upload_date(&self) -> &Observable<Option<DateTime<Utc>>> {
        &self.max_upload_date
    }

    pub fn set_creative_commons_only(&self, enabled: bool) {
        self.creative_commons_only.set(enabled);
    }

    pub fn set_date_filter(&self, filter: DateFilter) {
        self.date_filter.set(filter);
    }

    /// Set the earliest upload date. A maximum earlier than the new minimum
    /// is pulled up to match.
    pub fn set_min_upload_date(&self, date: Option<DateTime<Utc>>) {
        self.min_upload_date.set(date);
        if let (Some(min), Some(max)) = (date, self.max_upload_date.get()) {
            if max < min {
                debug!(target: "filters", "max upload date {} moved up to {}", max, min);
                self.max_upload_date.set(Some(min));
            }
        }
    }

    /// Set the latest upload date. A minimum later than the new maximum
    /// is pulled down to match.
    pub fn set_max_upload_date(&self, date: Option<DateTime<Utc>>) {
        self.max_upload_date.set(date);
        if let (Some(max), Some(min)) = (date, self.min_upload_date.get()) {
            if min > max {
                debug!(target: "filters", "min upload date {} moved down to {}", min, max);
                self.min_upload_date.set(Some(max));
            }
        }
    }

    /// Switch the date filter off and forget the range
    pub fn clear_date_range(&self) {
        self.date_filter.set(DateFilter::Any);
        self.min_upload_date.set(None);
        self.max_upload_date.set(None);
    }

    /// Combined change stream over all four settings
    pub fn changes(&self) -> FilterChanges {
        FilterChanges {
            creative_commons_only: self.creative_commons_only.subscribe(),
            date_filter: self.date_filter.subscribe(),
            min_upload_date: self.min_upload_date.subscribe(),
            max_upload_date: self.max_upload_date.subscribe(),
        }
    }
}

/// Wakes whenever any of the filter settings changes
pub struct FilterChanges {
    creative_commons_only: watch::Receiver<bool>,
    date_filter: watch::Receiver<DateFilter>,
    min_upload_date: watch::Receiver<Option<DateTime<Utc>>>,
    max_upload_date: watch::Receiver<Option<DateTime<Utc>>>,
}

impl FilterChanges {
    /// Wait for the next change. Errors once the settings are dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        tokio::select! {
            r = self.creative_commons_only.changed() => r,
            r = self.date_filter.changed() => r,
            r = self.min_upload_date.changed() => r,
            r = self.max_upload_date.changed() => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let filters = FilterSettings::new();
        assert!(!filters.creative_commons_only().get());
        assert_eq!(filters.date_filter().get(), DateFilter::Any);
        assert_eq!(filters.min_upload_date().get(), None);
        assert_eq!(filters.max_upload_date().get(), None);
    }

    #[test]
    fn test_min_after_max_pulls_max_up() {
        let filters = FilterSettings::new();
        filters.set_max_upload_date(Some(day(10)));
        filters.set_min_upload_date(Some(day(20)));
        assert_eq!(filters.min_upload_date().get(), Some(day(20)));
        assert_eq!(filters.max_upload_date().get(), Some(day(20)));
    }

    #[test]
    fn test_max_before_min_pulls_min_down() {
        let filters = FilterSettings::new();
        filters.set_min_upload_date(Some(day(10)));
        filters.set_max_upload_date(Some(day(5)));
        assert_eq!(filters.min_upload_date().get(), Some(day(5)));
        assert_eq!(filters.max_upload_date().get(), Some(day(5)));
    }

    #[test]
    fn test_coherent_range_left_alone() {
        let filters = FilterSettings::new();
        filters.set_min_upload_date(Some(day(1)));
        filters.set_max_upload_date(Some(day(9)));
        assert_eq!(filters.min_upload_date().get(), Some(day(1)));
        assert_eq!(filters.max_upload_date().get(), Some(day(9)));
    }

    #[test]
    fn test_clear_date_range_drops_bounds() {
        let filters = FilterSettings::new();
        filters.set_min_upload_date(Some(day(1)));
        filters.set_max_upload_date(Some(day(9)));
        filters.set_date_filter(DateFilter::UploadedBetween);

        filters.clear_date_range();
        assert_eq!(filters.date_filter().get(), DateFilter::Any);
        assert_eq!(filters.min_upload_date().get(), None);
        assert_eq!(filters.max_upload_date().get(), None);
    }

    #[tokio::test]
    async fn test_changes_wakes_for_any_setting() {
        let filters = FilterSettings::new();
        let mut changes = filters.changes();

        filters.set_creative_commons_only(true);
        changes.changed().await.unwrap();

        filters.set_date_filter(DateFilter::UploadedBetween);
        changes.changed().await.unwrap();
    }

    #[tokio::test]
    async fn test_setting_same_value_is_not_a_change() {
        let filters = FilterSettings::new();
        let mut changes = filters.changes();

        filters.set_creative_commons_only(false);
        let woke = tokio::time::timeout(Duration::from_millis(20), changes.changed()).await;
        assert!(woke.is_err());
    }
}
