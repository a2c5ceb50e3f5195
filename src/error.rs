// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that reach the caller of an extractor or the runner.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Source file does not exist. The delivery side reports "no data".
    #[error("source not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Feed text is not well-formed XML.
    #[error("malformed feed: {0}")]
    MalformedInput(String),

    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize envelope: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// True when there was simply nothing to read.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, ScrapeError::MissingSource(_))
    }
}

/// A single field's raw text could not be coerced.
/// Always recovered into an absent field; never returned by an extractor.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FieldError {
    #[error("rating {0:?} is not a number")]
    BadRating(String),
    #[error("rating {0} is outside 0-5")]
    RatingOutOfRange(f64),
    #[error("timestamp {0:?} is not ISO-8601")]
    BadTimestamp(String),
}
