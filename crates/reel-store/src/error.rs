use reel_models::ListName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{id} is already tracked")]
    DuplicateEntry { id: String },

    #[error("rating must be between 0 and 5, got {rating}")]
    InvalidRating { rating: u8 },

    /// The in-memory mutation has already happened when this is returned;
    /// memory stays the source of truth for the rest of the session.
    #[error("failed to persist the {list} list: {source}")]
    Persistence {
        list: ListName,
        #[source]
        source: anyhow::Error,
    },
}
