// src/specs/mod.rs
//! # Extraction "specs"
//!
//! One module per source shape. Each encodes *where the data lives* in that
//! shape and turns it into [`ActivityRecord`]s.
//!
//! - `activity` – the saved activity page (HTML fragment). Tag events drive a
//!   small explicit state machine; tolerant of sloppy markup, never fails.
//! - `feed` – the diary RSS feed. Strict XML; a broken document is an error.
//!
//! Both fill a [`Draft`](crate::data::Draft) and finish it through the shared
//! helpers in [`crate::format`], so glyphs, dates and review cleanup are
//! identical whichever path produced the record.
//!
//! Specs only extract. Selecting, shaping and writing the envelope happen in
//! `format` and `runner`.

pub mod activity;
pub mod feed;

pub use activity::ActivityPage;
pub use feed::DiaryFeed;

use crate::data::ActivityRecord;
use crate::error::ScrapeError;

/// Raw source text in, records out (source order, newest first).
///
/// Implementations hold no state between calls.
pub trait Extractor {
    fn extract(&self, source: &str) -> Result<Vec<ActivityRecord>, ScrapeError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SourceKind {
    /// Activity page HTML
    Markup,
    /// Diary RSS feed
    Feed,
}

impl SourceKind {
    /// Sniff the first non-blank bytes: an XML declaration or `<rss` means feed.
    /// Leading comments and `<!DOCTYPE …>` are skipped first.
    pub fn detect(source: &str) -> Self {
        let mut head = source.trim_start_matches('\u{feff}').trim_start();
        loop {
            let rest = if let Some(comment) = head.strip_prefix("<!--") {
                comment.split_once("-->")
            } else if head.starts_with("<!") {
                head.split_once('>')
            } else {
                break;
            };
            head = rest.map_or("", |(_, after)| after).trim_start();
        }
        let head: String = head.chars().take(8).collect::<String>().to_ascii_lowercase();
        if head.starts_with("<?xml") || head.starts_with("<rss") {
            SourceKind::Feed
        } else {
            SourceKind::Markup
        }
    }

    pub fn extractor(self) -> &'static dyn Extractor {
        match self {
            SourceKind::Markup => &ActivityPage,
            SourceKind::Feed => &DiaryFeed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_feed_and_markup() {
        assert_eq!(SourceKind::detect("<?xml version=\"1.0\"?><rss/>"), SourceKind::Feed);
        assert_eq!(SourceKind::detect("\n  <RSS version=\"2.0\">"), SourceKind::Feed);
        assert_eq!(SourceKind::detect("<section class=\"activity-row\">"), SourceKind::Markup);
        assert_eq!(SourceKind::detect(""), SourceKind::Markup);
    }

    #[test]
    fn detect_skips_leading_comments_and_doctype() {
        assert_eq!(SourceKind::detect("<!-- saved feed -->\n<rss version=\"2.0\">"), SourceKind::Feed);
        assert_eq!(SourceKind::detect("<!DOCTYPE rss><!-- x --> <rss>"), SourceKind::Feed);
        assert_eq!(SourceKind::detect("<!doctype html><html><body>"), SourceKind::Markup);
        assert_eq!(SourceKind::detect("<!-- never closed <rss>"), SourceKind::Markup);
    }
}
