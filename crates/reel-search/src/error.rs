use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("enter a title to search for")]
    EmptyQuery,

    #[error("no matches for '{query}'")]
    NotFound { query: String },

    #[error("search request could not complete: {reason}")]
    Transport { reason: String },

    /// A newer query was issued while this one was in flight; the caller
    /// must discard this result.
    #[error("superseded by a newer search")]
    Superseded,
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Transport {
            reason: e.to_string(),
        }
    }
}
