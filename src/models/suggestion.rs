use serde::{Deserialize, Serialize};

/// One title suggested by the suggestion service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    /// Absent when the service could not match the input
    #[serde(default)]
    pub movie_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub popularity_rank: Option<i64>,
}

/// Body of a suggestion-list response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub message: String,
}

impl SuggestionResponse {
    /// Drops every suggestion that carries no movie id
    pub fn purge_failures(&mut self) {
        self.suggestions.retain(|suggestion| suggestion.movie_id.is_some());
    }

    /// True if some suggestion's title is exactly `literal`
    pub fn has_exact_title(&self, literal: &str) -> bool {
        self.suggestions
            .iter()
            .any(|suggestion| suggestion.title.as_deref() == Some(literal))
    }
}
