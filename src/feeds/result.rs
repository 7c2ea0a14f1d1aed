#![allow(clippy::module_name_repetitions)]

use std::error::Error;
use std::fmt;

use crate::feeds::ingest::IngestReport;
use crate::models::Feed;

/// Failure to retrieve a feed document. Feed-scoped: the aggregator logs it
/// and moves on to the next tick.
#[derive(Debug)]
pub enum FetchError {
    Timedout { url: String, error: reqwest::Error },
    Transport { url: String, error: reqwest::Error },
    Status { url: String, status: reqwest::StatusCode },
    Body { url: String, error: reqwest::Error },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timedout { url, .. } => write!(f, "timed out fetching {}", url),
            Self::Transport { url, error } => write!(f, "could not fetch {}: {}", url, error),
            Self::Status { url, status } => write!(f, "fetching {} returned {}", url, status),
            Self::Body { url, error } => {
                write!(f, "could not read response body from {}: {}", url, error)
            }
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Timedout { error, .. } | Self::Transport { error, .. } | Self::Body { error, .. } => {
                Some(error)
            }
            Self::Status { .. } => None,
        }
    }
}

#[derive(Debug)]
pub enum ParseError {
    Xml(xml::reader::Error),
    MissingChannel,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(error) => write!(f, "malformed feed document: {}", error),
            Self::MissingChannel => write!(f, "feed document has no <channel> element"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Xml(error) => Some(error),
            Self::MissingChannel => None,
        }
    }
}

impl From<xml::reader::Error> for ParseError {
    fn from(error: xml::reader::Error) -> Self {
        Self::Xml(error)
    }
}

/// Why a single date layout did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    Empty,
    Weekday(String),
    Chrono(chrono::ParseError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "date is empty"),
            Self::Weekday(value) => write!(f, "expected a weekday name, found {:?}", value),
            Self::Chrono(error) => write!(f, "{}", error),
        }
    }
}

impl From<chrono::ParseError> for LayoutError {
    fn from(error: chrono::ParseError) -> Self {
        Self::Chrono(error)
    }
}

/// No known layout matched. Item-scoped: the item is still stored, undated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeError {
    pub raw: String,
    pub last: LayoutError,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse pubDate {:?}: {}", self.raw, self.last)
    }
}

impl Error for NormalizeError {}

#[derive(Debug)]
pub enum FeedPollError {
    Fetch(FetchError),
    Parse(ParseError),
    Database(diesel::result::Error),
}

impl fmt::Display for FeedPollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(error) => write!(f, "{}", error),
            Self::Parse(error) => write!(f, "{}", error),
            Self::Database(error) => write!(f, "database error: {}", error),
        }
    }
}

impl Error for FeedPollError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fetch(error) => Some(error),
            Self::Parse(error) => Some(error),
            Self::Database(error) => Some(error),
        }
    }
}

impl From<FetchError> for FeedPollError {
    fn from(error: FetchError) -> Self {
        Self::Fetch(error)
    }
}

impl From<ParseError> for FeedPollError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<diesel::result::Error> for FeedPollError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

/// What a single aggregator tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// No feeds are registered.
    Idle,
    Ingested { feed: Feed, report: IngestReport },
    /// `feed` is `None` when the failure happened while picking a feed.
    Failed {
        feed: Option<Feed>,
        error: FeedPollError,
    },
    Cancelled,
}
