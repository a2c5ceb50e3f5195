// src/core/sanitize.rs
use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// "Translate" button plus the "Translated from …" note Letterboxd appends to
// non-English reviews. Both trail the review body.
static TRANSLATED_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*Translate\s*Translated from.*$").expect("translated-from regex")
});
static TRAILING_TRANSLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*Translate\s*$").expect("trailing translate regex"));

/// Decode named and numeric HTML entities (`&amp;`, `&#8217;`, `&nbsp;`, …).
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

pub fn strip_translate_ui(s: &str) -> String {
    let s = TRANSLATED_FROM.replace_all(s, "");
    TRAILING_TRANSLATE.replace_all(&s, "").into_owned()
}

/// Trim every line and drop the blank ones.
pub fn nonblank_lines(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut to at most `max` chars, appending `...` when something was dropped.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => join!(&s[..cut], "..."),
        None => s!(s),
    }
}
