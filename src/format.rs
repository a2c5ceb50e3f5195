// src/format.rs
//! Normalization and envelope building shared by both extractors.
//!
//! Everything that turns raw field text into display text lives here so the
//! markup and feed paths cannot drift apart: star glyphs, timestamp parsing,
//! review cleanup, film links. `build_envelope` then shapes a record list into
//! the `merge_variables` payload the display service binds against.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;

use crate::config::consts::*;
use crate::core::sanitize;
use crate::data::ActivityRecord;
use crate::error::FieldError;

static FILM_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/film/([^/?#]+)").expect("film slug regex"));

/* ---------------- field helpers ---------------- */

/// `★` per whole star, plus `½` when the fraction is at least a half.
pub fn render_stars(rating: f64) -> String {
    let whole = rating.floor();
    let mut out: String = std::iter::repeat_n(FULL_STAR, whole.max(0.0) as usize).collect();
    if rating - whole >= 0.5 {
        out.push(HALF_STAR);
    }
    out
}

/// Snap to the nearest half star. Values outside 0–5 are rejected.
pub fn snap_rating(raw: f64) -> Result<f64, FieldError> {
    if !raw.is_finite() || !(0.0..=5.0).contains(&raw) {
        return Err(FieldError::RatingOutOfRange(raw));
    }
    Ok((raw * 2.0).round() / 2.0)
}

/// ISO-8601-ish timestamp as wall-clock time. Accepts RFC 3339 with `Z` or an
/// offset, naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`, and a bare `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, FieldError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(FieldError::BadTimestamp(s!(raw)))
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FMT).to_string()
}

pub fn format_date_short(dt: &NaiveDateTime) -> String {
    dt.format(DATE_SHORT_FMT).to_string()
}

/// Trimmed review; `None` for empty text or a bare "Watched on …" stub.
pub fn clean_review(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with(WATCHED_STUB) {
        return None;
    }
    Some(s!(text))
}

/// `(slug, absolute url)` for a film link. Needs a `/film/` segment and at
/// least three slashes; relative links get the site origin.
pub fn film_link(href: &str) -> Option<(String, String)> {
    let href = href.trim();
    if !href.contains("/film/") || href.matches('/').count() < 3 {
        return None;
    }
    let slug = FILM_SLUG.captures(href)?.get(1)?.as_str();

    let url = if href.starts_with("http://") || href.starts_with("https://") {
        s!(href)
    } else if href.starts_with('/') {
        join!(BASE_URL, href)
    } else {
        join!(BASE_URL, "/", href)
    };
    Some((s!(slug), url))
}

/// Short review for console listings.
pub fn preview(review: &str) -> String {
    sanitize::truncate_chars(review, PREVIEW_CHARS)
}

/* ---------------- envelope ---------------- */

/// One entry of `movies`; every key always present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieEntry {
    pub title: String,
    pub year: String,
    /// Absent ratings become 0, indistinguishable from a real zero. Serialized
    /// as `0.0` (a JSON float); templates treat it the same as `0`.
    pub rating: f64,
    pub rating_display: String,
    pub review: String,
    pub date: String,
    pub date_short: String,
    pub url: String,
}

impl From<&ActivityRecord> for MovieEntry {
    fn from(r: &ActivityRecord) -> Self {
        let text = |f: &Option<String>| f.clone().unwrap_or_default();
        Self {
            title: r.title.clone(),
            year: text(&r.year),
            rating: r.rating.unwrap_or(0.0),
            rating_display: text(&r.rating_display),
            review: text(&r.review),
            date: text(&r.date),
            date_short: text(&r.date_short),
            url: text(&r.url),
        }
    }
}

/// Flattened copy of `movies[0]` for simple template binding.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Latest {
    pub latest_title: String,
    pub latest_year: String,
    /// The glyph string, not the number.
    pub latest_rating: String,
    pub latest_review: String,
    pub latest_date: String,
}

impl From<&MovieEntry> for Latest {
    fn from(m: &MovieEntry) -> Self {
        Self {
            latest_title: m.title.clone(),
            latest_year: m.year.clone(),
            latest_rating: m.rating_display.clone(),
            latest_review: m.review.clone(),
            latest_date: m.date.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Envelope {
    pub user: String,
    pub update_time: String,
    pub movies: Vec<MovieEntry>,
    pub total_activities: usize,
    #[serde(flatten)]
    pub latest: Option<Latest>,
}

/// What gets published: `{"merge_variables": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Payload {
    pub merge_variables: Envelope,
}

impl From<Envelope> for Payload {
    fn from(merge_variables: Envelope) -> Self {
        Self { merge_variables }
    }
}

/// First `limit` records, stamped with the current local time.
pub fn build_envelope(records: &[ActivityRecord], limit: usize, user: &str) -> Envelope {
    build_envelope_at(records, limit, user, Local::now().naive_local())
}

/// Same as [`build_envelope`] with an explicit generation time.
pub fn build_envelope_at(
    records: &[ActivityRecord],
    limit: usize,
    user: &str,
    now: NaiveDateTime,
) -> Envelope {
    let movies: Vec<MovieEntry> = records.iter().take(limit).map(MovieEntry::from).collect();

    Envelope {
        user: s!(user),
        update_time: now.format(UPDATE_TIME_FMT).to_string(),
        total_activities: movies.len(),
        latest: movies.first().map(Latest::from),
        movies,
    }
}
