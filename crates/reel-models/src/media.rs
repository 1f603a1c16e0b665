use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub imdb_id: String,
    pub title: String,
    pub year: String, // As delivered by the service; series carry ranges like "2010–2013"
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default)]
    pub rating: u8, // 0 = unrated; meaningful only while the record is in the watched list
    #[serde(default = "unix_epoch")]
    pub added_at: DateTime<Utc>,
}

impl MovieRecord {
    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }
}

// Blobs written before added_at existed deserialize with the epoch sentinel
fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
    Game,
    Other,
}

impl MediaType {
    /// Normalize the service's free-form `Type` field. Unrecognized values
    /// collapse to `Other` rather than failing the whole response.
    pub fn from_type_str(s: &str) -> Self {
        match s {
            "movie" => MediaType::Movie,
            "series" => MediaType::Series,
            "episode" => MediaType::Episode,
            "game" => MediaType::Game,
            _ => MediaType::Other,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
            MediaType::Game => "game",
            MediaType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_record_round_trips_through_json() {
        let record = MovieRecord {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            media_type: MediaType::Movie,
            poster: Some("https://img.example/inception.jpg".to_string()),
            rating: 3,
            added_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: MovieRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_optional_fields_take_defaults() {
        let record: MovieRecord = serde_json::from_str(
            r#"{"imdb_id":"tt001","title":"Movie 1","year":"2010","media_type":"movie"}"#,
        )
        .unwrap();

        assert_eq!(record.poster, None);
        assert_eq!(record.rating, 0);
        assert_eq!(record.added_at, unix_epoch());
    }

    #[test]
    fn test_from_type_str_collapses_unknown_values() {
        assert_eq!(MediaType::from_type_str("series"), MediaType::Series);
        assert_eq!(MediaType::from_type_str("game"), MediaType::Game);
        assert_eq!(MediaType::from_type_str("short"), MediaType::Other);
    }
}
