// src/specs/feed.rs
//! Diary RSS feed extractor.
//!
//! Each `<item>` carries vendor-namespaced children. Only the local name is
//! matched, so `letterboxd:filmTitle` and a prefix-less `filmTitle` both work:
//!
//! - `filmTitle`, `filmYear`
//! - `link` (permalink; slug + url)
//! - `memberRating` (already in stars, `4.5`)
//! - `watchedDate` (`2024-12-25`)
//! - `description` (HTML, usually CDATA: poster `<img>` then `<p>` review).
//!   Raw XHTML children are written back out as bare tags for the same cleanup.
//!
//! Unlike the activity page the feed must be well-formed: any XML error, an
//! unclosed element, or a document without a root is `MalformedInput`.

use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

use super::Extractor;
use crate::core::html::strip_tags;
use crate::core::sanitize::{decode_entities, nonblank_lines};
use crate::data::{ActivityRecord, Draft};
use crate::error::{FieldError, ScrapeError};
use crate::format;

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("img regex"));
static P_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p\b[^>]*>").expect("p open regex"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>|<br\s*/?>").expect("line break regex"));

/// `DiaryFeed.extract(feed)`; fails only on malformed XML.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiaryFeed;

impl Extractor for DiaryFeed {
    fn extract(&self, source: &str) -> Result<Vec<ActivityRecord>, ScrapeError> {
        extract(source)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Title,
    Year,
    Link,
    Rating,
    Watched,
    Description,
}

impl Field {
    fn from_local(name: &[u8]) -> Option<Self> {
        match name {
            b"filmTitle" => Some(Field::Title),
            b"filmYear" => Some(Field::Year),
            b"link" => Some(Field::Link),
            b"memberRating" => Some(Field::Rating),
            b"watchedDate" => Some(Field::Watched),
            b"description" => Some(Field::Description),
            _ => None,
        }
    }
}

pub fn extract(feed: &str) -> Result<Vec<ActivityRecord>, ScrapeError> {
    // untrimmed: whitespace between inline XHTML elements in a description counts
    let mut reader = Reader::from_str(feed);
    reader.config_mut().trim_text(false);

    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    let mut item: Option<Draft> = None;
    let mut item_depth = 0usize;
    // field being read and the depth its element opened at
    let mut field: Option<(Field, usize)> = None;
    let mut text = String::new();
    let mut items_seen = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                saw_root = true;
                let local = e.local_name();
                let name = local.as_ref();

                if let Some((Field::Description, _)) = field {
                    push_tag(&mut text, "", name, "");
                } else if item.is_none() && name == b"item" {
                    item = Some(Draft::default());
                    item_depth = depth;
                    items_seen += 1;
                } else if item.is_some() && field.is_none() && depth == item_depth + 1 {
                    if let Some(f) = Field::from_local(name) {
                        field = Some((f, depth));
                        text.clear();
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                saw_root = true;
                if let Some((Field::Description, _)) = field {
                    push_tag(&mut text, "", e.local_name().as_ref(), "/");
                }
            }
            Ok(Event::End(e)) => {
                if let Some((f, d)) = field {
                    if d == depth {
                        if let Some(draft) = item.as_mut() {
                            apply(draft, f, &text);
                        }
                        field = None;
                    } else if f == Field::Description {
                        push_tag(&mut text, "/", e.local_name().as_ref(), "");
                    }
                }
                if item.is_some() && depth == item_depth {
                    if let Some(rec) = item.take().and_then(Draft::finish) {
                        out.push(rec);
                    } else {
                        logd!("Feed: dropped untitled item #{items_seen}");
                    }
                }
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ScrapeError::MalformedInput(format!(
                        "unmatched end tag at byte {}",
                        reader.buffer_position()
                    ))
                })?;
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    text.push_str(&decode_entities(&String::from_utf8_lossy(&e)));
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ScrapeError::MalformedInput(format!(
                    "at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(ScrapeError::MalformedInput(s!("no root element")));
    }
    if depth != 0 {
        return Err(ScrapeError::MalformedInput(format!("{depth} element(s) left open")));
    }

    logd!("Feed: {} record(s) from {items_seen} item(s)", out.len());
    Ok(out)
}

fn apply(draft: &mut Draft, field: Field, raw: &str) {
    let value = raw.trim();
    if value.is_empty() {
        return;
    }
    match field {
        Field::Title => draft.title = Some(s!(value)),
        Field::Year => draft.year = Some(s!(value)),
        Field::Link => draft.set_link(value),
        Field::Rating => match parse_member_rating(value) {
            Ok(stars) => draft.rating = Some(stars),
            Err(e) => logd!("Feed: {e}"),
        },
        Field::Watched => draft.datetime = Some(s!(value)),
        Field::Description => draft.review = Some(description_text(value)),
    }
}

fn push_tag(out: &mut String, open: &str, name: &[u8], close: &str) {
    out.push_str(&format!("<{open}{}{close}>", String::from_utf8_lossy(name)));
}

fn parse_member_rating(raw: &str) -> Result<f64, FieldError> {
    let stars: f64 = raw
        .parse()
        .map_err(|_| FieldError::BadRating(s!(raw)))?;
    format::snap_rating(stars)
}

/// Description HTML to plain review lines.
fn description_text(html: &str) -> String {
    let s = IMG_TAG.replace_all(html, "");
    let s = P_OPEN.replace_all(&s, "");
    let s = LINE_BREAK.replace_all(&s, "\n");
    let s = strip_tags(s);
    nonblank_lines(&decode_entities(&s))
}
