//! Java `.properties` codec.
//!
//! The credentials file and the URL cache file are both written in this
//! format, so keys such as `https://account.api.here.com/oauth2/token` have
//! their `:` escaped on disk and are unescaped on load.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// Ordered key/value set read from or written to a properties file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text.
    ///
    /// Malformed escapes are kept literally; parsing never fails.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut properties = Self::new();
        let mut lines = text.lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim_start_matches([' ', '\t', '\u{c}']);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start_matches([' ', '\t', '\u{c}'])),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            properties.insert(unescape(key), unescape(value));
        }

        properties
    }

    /// Load properties from a file.
    ///
    /// The file is decoded as UTF-8, or as ISO-8859-1 if it is not valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = match String::from_utf8(fs::read(path)?) {
            Ok(text) => text,
            Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
        };
        Ok(Self::parse(&text))
    }

    /// Write all entries to `path`, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn store(&self, path: &Path, comment: &str) -> io::Result<()> {
        fs::write(path, self.to_text(comment))
    }

    /// Render entries as properties text with a comment header.
    #[must_use]
    pub fn to_text(&self, comment: &str) -> String {
        let mut text = String::new();
        if !comment.is_empty() {
            let _ = writeln!(text, "#{comment}");
        }
        let _ = writeln!(text, "#{}", chrono::Utc::now().to_rfc2822());
        for (key, value) in &self.entries {
            let _ = writeln!(text, "{}={}", escape(key, true), escape(value, false));
        }
        text
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Merge another set into this one, overwriting existing keys.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Split a logical line at the first unescaped separator.
fn split_entry(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut key_end = bytes.len();
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if matches!(b, b'=' | b':' | b' ' | b'\t' | b'\x0c') {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\u{c}']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    (key, rest)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut pending_high: Option<u16> = None;

    while let Some(c) = chars.next() {
        if c == '\\' {
            let next = chars.next();
            if next == Some('u') {
                let hex: String = chars.clone().take(4).collect();
                if let (4, Ok(unit)) = (hex.len(), u16::from_str_radix(&hex, 16)) {
                    chars.nth(3);
                    push_utf16_unit(&mut out, &mut pending_high, unit);
                    continue;
                }
            }
            flush_surrogate(&mut out, &mut pending_high);
            match next {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('f') => out.push('\u{c}'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            flush_surrogate(&mut out, &mut pending_high);
            out.push(c);
        }
    }
    flush_surrogate(&mut out, &mut pending_high);
    out
}

fn push_utf16_unit(out: &mut String, pending_high: &mut Option<u16>, unit: u16) {
    if let Some(high) = pending_high.take() {
        if (0xDC00..0xE000).contains(&unit) {
            let decoded = char::decode_utf16([high, unit]).next();
            out.push(decoded.and_then(Result::ok).unwrap_or(char::REPLACEMENT_CHARACTER));
            return;
        }
        out.push(char::REPLACEMENT_CHARACTER);
    }
    if (0xD800..0xDC00).contains(&unit) {
        *pending_high = Some(unit);
    } else {
        out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
}

fn flush_surrogate(out: &mut String, pending_high: &mut Option<u16>) {
    if pending_high.take().is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
}

fn escape(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len() * 2);
    for (i, c) in raw.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if (' '..='~').contains(&c) => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04X}");
                }
            }
        }
    }
    out
}
