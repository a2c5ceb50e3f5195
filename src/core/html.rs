// src/core/html.rs
// Tag-event tokenizer for loosely formed HTML fragments.
// Yields open tags, close tags and text runs in document order and never fails:
// a '<' that does not start a tag is passed through as text.
// Tag and attribute names are lower-cased; attribute values and text are
// entity-decoded.

use std::borrow::Cow;

use super::sanitize::decode_entities;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub self_closing: bool,
}

impl Tag {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Substring match on the raw `class` value (`"rating rated-9"` contains `"rated-"`).
    pub fn class_contains(&self, needle: &str) -> bool {
        self.attr("class").is_some_and(|c| c.contains(needle))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Open(Tag),
    Close(String),
    Text(Cow<'a, str>),
}

enum Step<'a> {
    Emit(Token<'a>),
    Skip,
    NotMarkup,
}

pub struct Tokens<'a> {
    s: &'a str,
    b: &'a [u8],
    i: usize,
    n: usize,
    // set after <script>/<style>: skip raw content up to this closing tag
    raw_close: Option<&'static str>,
}

impl<'a> Tokens<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, b: s.as_bytes(), i: 0, n: s.len(), raw_close: None }
    }

    #[inline]
    fn skip_ws(&mut self) {
        while self.i < self.n && self.b[self.i].is_ascii_whitespace() {
            self.i += 1;
        }
    }

    #[inline]
    fn skip_past(&mut self, pat: &str) {
        match find_ci(&self.s[self.i..], pat) {
            Some(off) => self.i += off + pat.len(),
            None => self.i = self.n,
        }
    }

    fn read_name(&mut self) -> &'a str {
        let start = self.i;
        while self.i < self.n {
            match self.b[self.i] {
                c if c.is_ascii_alphanumeric() => self.i += 1,
                b'-' | b'_' | b':' => self.i += 1,
                _ => break,
            }
        }
        &self.s[start..self.i]
    }

    // called when current byte is '<'
    fn read_markup(&mut self) -> Step<'a> {
        let b: &'a [u8] = self.b;
        let rest = &b[self.i..];

        if rest.starts_with(b"<!--") {
            self.i += 4;
            self.skip_past("-->");
            return Step::Skip;
        }
        if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
            self.skip_past(">");
            return Step::Skip;
        }

        if rest.starts_with(b"</") {
            let save = self.i;
            self.i += 2;
            let name = self.read_name();
            if name.is_empty() {
                self.i = save;
                return Step::NotMarkup;
            }
            let name = name.to_ascii_lowercase();
            self.skip_past(">");
            return Step::Emit(Token::Close(name));
        }

        match rest.get(1) {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return Step::NotMarkup,
        }

        self.i += 1;
        let name = self.read_name().to_ascii_lowercase();
        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_ws();
            if self.i >= self.n {
                break;
            }
            match self.b[self.i] {
                b'>' => {
                    self.i += 1;
                    break;
                }
                b'/' => {
                    self.i += 1;
                    if self.i < self.n && self.b[self.i] == b'>' {
                        self_closing = true;
                        self.i += 1;
                        break;
                    }
                }
                _ => {
                    if let Some(attr) = self.read_attr() {
                        attrs.push(attr);
                    }
                }
            }
        }

        if !self_closing && (name == "script" || name == "style") {
            self.raw_close = Some(if name == "script" { "</script" } else { "</style" });
        }

        Step::Emit(Token::Open(Tag { name, attrs, self_closing }))
    }

    fn read_attr(&mut self) -> Option<(String, String)> {
        let start = self.i;
        while self.i < self.n {
            match self.b[self.i] {
                c if c.is_ascii_whitespace() => break,
                b'=' | b'>' | b'/' => break,
                _ => self.i += 1,
            }
        }
        if self.i == start {
            // stray '=' or quote; step over it
            self.i += 1;
            return None;
        }
        let key = self.s[start..self.i].to_ascii_lowercase();

        self.skip_ws();
        if self.i >= self.n || self.b[self.i] != b'=' {
            return Some((key, s!()));
        }
        self.i += 1;
        self.skip_ws();

        let value = match self.b.get(self.i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                self.i += 1;
                let vs = self.i;
                while self.i < self.n && self.b[self.i] != q {
                    self.i += 1;
                }
                let v = &self.s[vs..self.i];
                if self.i < self.n {
                    self.i += 1;
                }
                v
            }
            _ => {
                let vs = self.i;
                while self.i < self.n
                    && !self.b[self.i].is_ascii_whitespace()
                    && self.b[self.i] != b'>'
                {
                    self.i += 1;
                }
                &self.s[vs..self.i]
            }
        };

        Some((key, decode_entities(value).into_owned()))
    }

    fn read_text(&mut self, from: usize) -> Token<'a> {
        let end = self.b[from..]
            .iter()
            .position(|&c| c == b'<')
            .map_or(self.n, |p| from + p);
        let raw = &self.s[self.i..end];
        self.i = end;
        Token::Text(decode_entities(raw))
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.i < self.n {
            if let Some(close) = self.raw_close.take() {
                match find_ci(&self.s[self.i..], close) {
                    Some(off) => self.i += off,
                    None => self.i = self.n,
                }
                continue;
            }

            if self.b[self.i] == b'<' {
                match self.read_markup() {
                    Step::Emit(tok) => return Some(tok),
                    Step::Skip => continue,
                    Step::NotMarkup => return Some(self.read_text(self.i + 1)),
                }
            }
            return Some(self.read_text(self.i));
        }
        None
    }
}

/// ASCII case-insensitive `find`.
pub fn find_ci(hay: &str, needle: &str) -> Option<usize> {
    let n = needle.as_bytes();
    if n.is_empty() {
        return Some(0);
    }
    hay.as_bytes()
        .windows(n.len())
        .position(|w| w.eq_ignore_ascii_case(n))
}

/// Drop every `<...>` run. Whitespace is left untouched.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}
