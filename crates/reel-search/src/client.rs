use crate::api;
use crate::error::SearchError;
use reel_models::MovieRecord;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// One ticket per issued query. A ticket stops being current the moment a
/// newer query is issued from the same client, which is how a stale
/// in-flight response is kept from overwriting newer results.
pub struct QueryTicket {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl QueryTicket {
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }
}

pub struct SearchClient {
    http: Client,
    api_key: String,
    endpoint: String,
    generation: Arc<AtomicU64>,
}

impl SearchClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, api::OMDB_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            endpoint,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn issue_ticket(&self) -> QueryTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        QueryTicket {
            generation,
            counter: Arc::clone(&self.generation),
        }
    }

    /// One title search, one attempt, first [`api::RESULT_CAP`] candidates.
    /// Responses to queries that were superseded while in flight come back
    /// as `Superseded` and must be discarded by the caller.
    pub async fn search(&self, query: &str) -> Result<Vec<MovieRecord>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let ticket = self.issue_ticket();
        let url = format!(
            "{}?apikey={}&s={}",
            self.endpoint,
            self.api_key,
            urlencoding::encode(query)
        );

        let body = self.fetch(&url).await?;

        if !ticket.is_current() {
            debug!("Discarding stale search response for '{}'", query);
            return Err(SearchError::Superseded);
        }

        api::decode_search(query, &body)
    }

    /// Fetch the full record for one identifier.
    pub async fn lookup(&self, imdb_id: &str) -> Result<MovieRecord, SearchError> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let url = format!(
            "{}?apikey={}&i={}",
            self.endpoint,
            self.api_key,
            urlencoding::encode(imdb_id)
        );

        let body = self.fetch(&url).await?;
        api::decode_lookup(imdb_id, &body)
    }

    async fn fetch(&self, url: &str) -> Result<String, SearchError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Search service returned {}: {}", status, error_text);
            return Err(SearchError::Transport {
                reason: format!("service returned {}", status),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let client = SearchClient::new("key".to_string());

        let first = client.issue_ticket();
        assert!(first.is_current());

        let second = client.issue_ticket();
        assert!(!first.is_current());
        assert!(second.is_current());

        let third = client.issue_ticket();
        assert!(!second.is_current());
        assert!(third.is_current());
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let client = SearchClient::new("key".to_string());

        assert!(matches!(
            client.search("").await.unwrap_err(),
            SearchError::EmptyQuery
        ));
        assert!(matches!(
            client.search("   \t ").await.unwrap_err(),
            SearchError::EmptyQuery
        ));
    }

    #[tokio::test]
    async fn test_lookup_rejects_blank_id() {
        let client = SearchClient::new("key".to_string());

        assert!(matches!(
            client.lookup("  ").await.unwrap_err(),
            SearchError::EmptyQuery
        ));
    }
}
