use serde::{Deserialize, Serialize};
use std::fmt;

/// The two tracked collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ListName {
    ToWatch,
    Watched,
}

impl ListName {
    /// Fixed storage key for the list blob. These match the keys the
    /// original client wrote, so existing data loads into the same lists.
    pub fn as_key(&self) -> &'static str {
        match self {
            ListName::ToWatch => "watchlist",
            ListName::Watched => "watched",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListName::ToWatch => write!(f, "to-watch"),
            ListName::Watched => write!(f, "watched"),
        }
    }
}

/// Which list, if any, currently contains a given identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    NotTracked,
    InToWatch,
    InWatched,
}
