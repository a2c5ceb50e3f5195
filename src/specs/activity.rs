// src/specs/activity.rs
//! Activity page (HTML fragment) extractor.
//!
//! Input is the saved `ajax/activity-pagination` fragment: one
//! `<section class="activity-row …">` per diary event. Inside a block:
//!
//! ```text
//! <h2 class="name">…title…</h2>            title (first non-verb text)
//! <a href="/films/year/2024/">             year
//! <a href="/nicolep/film/wicked-2024/">    slug + url
//! <span class="rating rated-9">            rating (9 / 2 = 4.5 stars)
//! <div class="js-review-body">…</div>      review text
//! <time datetime="2024-12-25T10:00:00">    timestamp
//! ```
//!
//! ## State machine
//!
//! | state        | trigger                                   | next                  |
//! |--------------|-------------------------------------------|-----------------------|
//! | Idle         | open `section.activity-row`               | InBlock (fresh draft) |
//! | InBlock      | open `h2.name`                            | InTitle               |
//! | InTitle      | close `h2`                                | InBlock               |
//! | InBlock/InTitle | open `span.rating`                     | InRating              |
//! | InRating     | close `span`                              | where it came from    |
//! | InBlock      | open `div.js-review-body`                 | InReviewBody          |
//! | InReviewBody | close of the div that opened it           | InBlock               |
//! | not Idle     | close of the block's own `section`        | Idle (record emitted) |
//!
//! Attribute-carried fields (year, link, rating class, timestamp) are read in
//! any non-Idle state. Text is only read in InTitle and InReviewBody.
//!
//! The title rule is a heuristic: the first text chunk under the heading that
//! is not a `watched`/`rewatched` verb badge. Markup that puts other text
//! ahead of the film name will yield that text.

use std::sync::LazyLock;

use regex::Regex;

use super::Extractor;
use crate::config::consts::*;
use crate::core::{sanitize, Tag, Token, Tokens};
use crate::data::{ActivityRecord, Draft};
use crate::error::ScrapeError;

static YEAR_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/films/year/(\d{4})/").expect("year href regex"));
static RATED_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rated-(\d+)").expect("rated class regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    InBlock,
    InTitle,
    InRating,
    InReviewBody,
}

/// `ActivityPage.extract(markup)`; never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActivityPage;

impl Extractor for ActivityPage {
    fn extract(&self, source: &str) -> Result<Vec<ActivityRecord>, ScrapeError> {
        Ok(extract(source))
    }
}

pub fn extract(markup: &str) -> Vec<ActivityRecord> {
    let mut machine = Machine::new();
    for tok in Tokens::new(markup) {
        machine.feed(tok);
    }
    let records = machine.finish();
    logd!("Activity page: {} record(s)", records.len());
    records
}

/// Tag-event state machine; one per extraction.
#[derive(Debug)]
pub struct Machine {
    state: State,
    draft: Draft,
    // open `section`s inside the current block, the block's own included
    section_depth: usize,
    // open `div`s inside the review body, its own included
    body_depth: usize,
    rating_return: State,
    out: Vec<ActivityRecord>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            draft: Draft::default(),
            section_depth: 0,
            body_depth: 0,
            rating_return: State::InBlock,
            out: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn feed(&mut self, tok: Token<'_>) {
        match tok {
            Token::Open(tag) => self.on_open(&tag),
            Token::Close(name) => self.on_close(&name),
            Token::Text(text) => self.on_text(&text),
        }
    }

    /// Records emitted so far. A block still open at end of input is kept
    /// when it already has a title.
    pub fn finish(mut self) -> Vec<ActivityRecord> {
        if self.state != State::Idle {
            logd!("Activity page: block left open at end of input");
            self.close_block();
        }
        self.out
    }

    fn on_open(&mut self, tag: &Tag) {
        if self.state == State::Idle {
            if tag.name == "section" && tag.class_contains(ACTIVITY_ROW_CLASS) && !tag.self_closing {
                self.draft = Draft::default();
                self.section_depth = 1;
                self.state = State::InBlock;
            }
            return;
        }

        self.capture_attrs(tag);

        if tag.self_closing {
            return;
        }
        match tag.name.as_str() {
            "section" => self.section_depth += 1,
            "div" if self.state == State::InReviewBody => self.body_depth += 1,
            "div" if self.state == State::InBlock && tag.class_contains(REVIEW_BODY_CLASS) => {
                self.body_depth = 1;
                self.state = State::InReviewBody;
            }
            "h2" if self.state == State::InBlock && tag.class_contains(TITLE_CLASS) => {
                self.state = State::InTitle;
            }
            "span"
                if matches!(self.state, State::InBlock | State::InTitle)
                    && tag.class_contains(RATING_CLASS) =>
            {
                self.rating_return = self.state;
                self.state = State::InRating;
            }
            _ => {}
        }
    }

    fn on_close(&mut self, name: &str) {
        match (self.state, name) {
            (State::Idle, _) => {}
            (_, "section") => {
                self.section_depth = self.section_depth.saturating_sub(1);
                if self.section_depth == 0 {
                    self.close_block();
                }
            }
            (State::InTitle, "h2") => self.state = State::InBlock,
            (State::InRating, "span") => self.state = self.rating_return,
            (State::InReviewBody, "div") => {
                self.body_depth = self.body_depth.saturating_sub(1);
                if self.body_depth == 0 {
                    self.state = State::InBlock;
                }
            }
            _ => {}
        }
    }

    fn on_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match self.state {
            State::InTitle if self.draft.title.is_none() && !VERB_BADGES.contains(&text) => {
                self.draft.title = Some(s!(text));
            }
            State::InReviewBody => self.draft.push_review(text),
            _ => {}
        }
    }

    fn capture_attrs(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            "a" => {
                if let Some(href) = tag.attr("href") {
                    if let Some(year) = year_from_href(href) {
                        self.draft.year = Some(year);
                    }
                    self.draft.set_link(href);
                }
            }
            "span" if tag.class_contains(RATING_CLASS) => {
                if let Some(stars) = tag.attr("class").and_then(rating_from_class) {
                    self.draft.rating = Some(stars);
                }
            }
            "time" => {
                if let Some(dt) = tag.attr("datetime") {
                    self.draft.datetime = Some(s!(dt));
                }
            }
            _ => {}
        }
    }

    fn close_block(&mut self) {
        let mut draft = std::mem::take(&mut self.draft);
        // the translate button and note sit inside the review body
        draft.review = draft.review.map(|r| sanitize::strip_translate_ui(&r));
        match draft.finish() {
            Some(rec) => self.out.push(rec),
            None => logd!("Activity page: dropped untitled block"),
        }
        self.state = State::Idle;
        self.section_depth = 0;
        self.body_depth = 0;
        self.rating_return = State::InBlock;
    }
}

/// Year from a `/films/year/NNNN/` link (relative or on the site origin).
fn year_from_href(href: &str) -> Option<String> {
    let path = href.strip_prefix(BASE_URL).unwrap_or(href);
    if !path.starts_with("/films/year/") {
        return None;
    }
    YEAR_HREF
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| s!(m.as_str()))
}

/// `rated-N` (N in 1..=10, half-star units) to stars.
fn rating_from_class(class: &str) -> Option<f64> {
    let n: u32 = RATED_CLASS.captures(class)?.get(1)?.as_str().parse().ok()?;
    (1..=10).contains(&n).then(|| n as f64 / 2.0)
}
