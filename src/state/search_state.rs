//! Observable state published by the search controller

use crate::model::{is_valid_query, Photo};

/// Everything the UI reads about the current search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query_text: String,
    pub is_valid: bool,
    /// Bumped on every write to the query text, even an unchanged one
    pub text_revision: u64,
    pub in_progress: bool,
    pub results: Vec<Photo>,
    pub last_error: Option<String>,
    /// Id of the most recent dispatch, 0 before the first one
    pub latest_dispatch: u64,
}

impl SearchState {
    pub fn with_query(text: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.set_query_text(text.into());
        state
    }

    /// Replace the query text and its validity together
    pub fn set_query_text(&mut self, text: String) {
        self.is_valid = is_valid_query(&text);
        self.query_text = text;
        self.text_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_follows_text() {
        let mut state = SearchState::with_query("Bond");
        assert!(state.is_valid);

        state.set_query_text("Bo".to_string());
        assert!(!state.is_valid);
        assert_eq!(state.query_text, "Bo");
    }

    #[test]
    fn test_rewriting_same_text_bumps_revision() {
        let mut state = SearchState::with_query("Bond");
        let before = state.text_revision;

        state.set_query_text("Bond".to_string());
        assert_eq!(state.text_revision, before + 1);
        assert!(state.is_valid);
    }

    #[test]
    fn test_default_is_idle_and_invalid() {
        let state = SearchState::default();
        assert!(!state.is_valid);
        assert!(!state.in_progress);
        assert!(state.results.is_empty());
        assert_eq!(state.last_error, None);
        assert_eq!(state.latest_dispatch, 0);
    }
}
