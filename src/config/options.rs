// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use crate::specs::SourceKind;

/// Everything one run needs. `Default` mirrors the constants in `consts`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Saved activity page or diary feed.
    pub source: PathBuf,
    /// Force an extractor; `None` sniffs the source text.
    pub kind: Option<SourceKind>,
    /// Write the envelope here; `None` leaves it to the caller (stdout in the CLI).
    pub out: Option<PathBuf>,
    /// Records kept in `movies`.
    pub limit: usize,
    pub user: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            kind: None,
            out: Some(PathBuf::from(DEFAULT_OUT_FILE)),
            limit: DEFAULT_LIMIT,
            user: s!(DEFAULT_USER),
        }
    }
}

impl RunOptions {
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_out(mut self, out: Option<PathBuf>) -> Self {
        self.out = out;
        self
    }

    pub fn with_kind(mut self, kind: Option<SourceKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
