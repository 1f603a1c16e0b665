use crate::error::SearchError;
use chrono::Utc;
use reel_models::{MediaType, MovieRecord};
use serde::Deserialize;
use tracing::debug;

pub const OMDB_ENDPOINT: &str = "https://www.omdbapi.com/";

/// Candidates past this cut are dropped before they reach the caller.
pub const RESULT_CAP: usize = 10;

/// Sentinel the service uses for missing artwork.
const NO_POSTER: &str = "N/A";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    results: Vec<CandidateEntry>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateEntry {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type")]
    media_type: String,
    #[serde(rename = "Poster")]
    poster: String,
}

// Lookup responses flatten the record into the envelope, and failure
// responses omit the record fields entirely, so everything is optional here.
#[derive(Debug, Deserialize)]
struct LookupEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

impl CandidateEntry {
    fn into_record(self) -> MovieRecord {
        MovieRecord {
            imdb_id: self.imdb_id,
            title: self.title,
            year: self.year,
            media_type: MediaType::from_type_str(&self.media_type),
            poster: poster_reference(self.poster),
            rating: 0,
            added_at: Utc::now(),
        }
    }
}

fn poster_reference(raw: String) -> Option<String> {
    if raw.is_empty() || raw == NO_POSTER {
        None
    } else {
        Some(raw)
    }
}

/// The service flags failures with `"Response": "False"` and a prose error.
/// Missing matches are the caller-correctable case; everything else
/// (invalid key, rate limit) is a transport-level failure.
fn failure_from_service(query: &str, error: Option<String>) -> SearchError {
    let reason = error.unwrap_or_else(|| "unspecified service error".to_string());
    if reason.to_lowercase().contains("not found") {
        SearchError::NotFound {
            query: query.to_string(),
        }
    } else {
        SearchError::Transport { reason }
    }
}

/// Decode a title-search response body into at most [`RESULT_CAP`]
/// candidates, in service order.
pub fn decode_search(query: &str, body: &str) -> Result<Vec<MovieRecord>, SearchError> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|e| SearchError::Transport {
            reason: format!("malformed response: {}", e),
        })?;

    if envelope.response != "True" {
        debug!("Search for '{}' failed at the service: {:?}", query, envelope.error);
        return Err(failure_from_service(query, envelope.error));
    }

    let total = envelope.results.len();
    if total > RESULT_CAP {
        debug!("Capping search results for '{}' from {} to {}", query, total, RESULT_CAP);
    }

    Ok(envelope
        .results
        .into_iter()
        .take(RESULT_CAP)
        .map(CandidateEntry::into_record)
        .collect())
}

/// Decode an id-lookup response body into a single record.
pub fn decode_lookup(imdb_id: &str, body: &str) -> Result<MovieRecord, SearchError> {
    let envelope: LookupEnvelope =
        serde_json::from_str(body).map_err(|e| SearchError::Transport {
            reason: format!("malformed response: {}", e),
        })?;

    if envelope.response != "True" {
        debug!("Lookup of {} failed at the service: {:?}", imdb_id, envelope.error);
        return Err(failure_from_service(imdb_id, envelope.error));
    }

    match (envelope.title, envelope.imdb_id) {
        (Some(title), Some(imdb_id)) => Ok(MovieRecord {
            imdb_id,
            title,
            year: envelope.year.unwrap_or_default(),
            media_type: MediaType::from_type_str(envelope.media_type.as_deref().unwrap_or("")),
            poster: envelope.poster.and_then(poster_reference),
            rating: 0,
            added_at: Utc::now(),
        }),
        _ => Err(SearchError::Transport {
            reason: "response is missing the record fields".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "Search": [
            {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666", "Type": "movie", "Poster": "https://img.example/inception.jpg"},
            {"Title": "Inception: The Cobol Job", "Year": "2010", "imdbID": "tt5295894", "Type": "movie", "Poster": "N/A"}
        ],
        "totalResults": "2",
        "Response": "True"
    }"#;

    #[test]
    fn test_decode_search_converts_candidates() {
        let records = decode_search("inception", SEARCH_BODY).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].imdb_id, "tt1375666");
        assert_eq!(records[0].title, "Inception");
        assert_eq!(records[0].year, "2010");
        assert_eq!(records[0].media_type, MediaType::Movie);
        assert_eq!(
            records[0].poster.as_deref(),
            Some("https://img.example/inception.jpg")
        );
        assert_eq!(records[0].rating, 0);
    }

    #[test]
    fn test_decode_search_maps_missing_poster_to_none() {
        let records = decode_search("inception", SEARCH_BODY).unwrap();
        assert_eq!(records[1].poster, None);
    }

    #[test]
    fn test_decode_search_caps_results() {
        let entries: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"Title": "Movie {i}", "Year": "200{}", "imdbID": "tt{i:07}", "Type": "movie", "Poster": "N/A"}}"#,
                    i % 10
                )
            })
            .collect();
        let body = format!(
            r#"{{"Search": [{}], "totalResults": "15", "Response": "True"}}"#,
            entries.join(",")
        );

        let records = decode_search("movie", &body).unwrap();
        assert_eq!(records.len(), RESULT_CAP);
        // Service order is preserved up to the cap
        assert_eq!(records[0].imdb_id, "tt0000000");
        assert_eq!(records[9].imdb_id, "tt0000009");
    }

    #[test]
    fn test_decode_search_reports_not_found() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        let err = decode_search("zzzz", body).unwrap_err();
        assert!(matches!(err, SearchError::NotFound { ref query } if query == "zzzz"));
    }

    #[test]
    fn test_decode_search_reports_service_errors_as_transport() {
        let body = r#"{"Response": "False", "Error": "Invalid API key!"}"#;
        let err = decode_search("inception", body).unwrap_err();
        assert!(matches!(err, SearchError::Transport { .. }));
    }

    #[test]
    fn test_decode_search_malformed_body_is_transport() {
        let err = decode_search("inception", "<html>oops</html>").unwrap_err();
        assert!(matches!(err, SearchError::Transport { .. }));
    }

    #[test]
    fn test_decode_lookup_full_record() {
        let body = r#"{
            "Title": "Inception", "Year": "2010", "Rated": "PG-13",
            "Genre": "Action, Adventure, Sci-Fi", "Director": "Christopher Nolan",
            "Poster": "https://img.example/inception.jpg",
            "imdbID": "tt1375666", "Type": "movie", "Response": "True"
        }"#;

        let record = decode_lookup("tt1375666", body).unwrap();
        assert_eq!(record.imdb_id, "tt1375666");
        assert_eq!(record.title, "Inception");
        assert_eq!(record.media_type, MediaType::Movie);
    }

    #[test]
    fn test_decode_lookup_unknown_id() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        let err = decode_lookup("tt0000001", body).unwrap_err();
        assert!(matches!(err, SearchError::Transport { .. }));
    }

    #[test]
    fn test_decode_lookup_series_year_range() {
        let body = r#"{
            "Title": "Sherlock", "Year": "2010–2017",
            "Poster": "N/A", "imdbID": "tt1475582", "Type": "series", "Response": "True"
        }"#;

        let record = decode_lookup("tt1475582", body).unwrap();
        assert_eq!(record.year, "2010–2017");
        assert_eq!(record.media_type, MediaType::Series);
        assert_eq!(record.poster, None);
    }
}
