// src/data.rs
//
// Record types shared by both extractors.
//
// - ActivityRecord: one finished diary entry. Immutable once built; derived
//                   fields (glyphs, display dates, cleaned review) are filled
//                   in exactly once, by `Draft::finish`.
// - Draft: field accumulator for the block/item currently being read. An
//          extractor owns one at a time and consumes it on block close, so an
//          emitted record can never be touched again.

use serde::Serialize;

use crate::format;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_short: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    pub title: Option<String>,
    pub year: Option<String>,
    pub slug: Option<String>,
    pub url: Option<String>,
    /// Stars, 0.0..=5.0 in half steps.
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub datetime: Option<String>,
}

impl Draft {
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Append one review chunk, single-space separated.
    pub fn push_review(&mut self, chunk: &str) {
        match &mut self.review {
            Some(r) => {
                r.push(' ');
                r.push_str(chunk);
            }
            None => self.review = Some(s!(chunk)),
        }
    }

    pub fn set_link(&mut self, href: &str) {
        if let Some((slug, url)) = format::film_link(href) {
            self.slug = Some(slug);
            self.url = Some(url);
        }
    }

    /// Turn the draft into a record. `None` when there is no title.
    pub fn finish(self) -> Option<ActivityRecord> {
        let title = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;

        let parsed = self.datetime.as_deref().and_then(|raw| {
            format::parse_timestamp(raw)
                .map_err(|e| logd!("{title}: {e}"))
                .ok()
        });

        Some(ActivityRecord {
            year: self.year,
            slug: self.slug,
            url: self.url,
            rating_display: self.rating.map(format::render_stars),
            rating: self.rating,
            review: self.review.as_deref().and_then(format::clean_review),
            date: parsed.as_ref().map(format::format_date),
            date_short: parsed.as_ref().map(format::format_date_short),
            datetime: self.datetime,
            title,
        })
    }
}
