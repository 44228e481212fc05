//! Insertion-ordered properties map and the `.properties` text format
//!
//! Supports `#`/`!` comment lines, `key=value`, `key:value`, and
//! whitespace-separated entries, backslash line continuation, and the
//! common escape sequences. `parse` and `store` round-trip.

use std::fs;
use std::io;
use std::path::Path;

/// Insertion-ordered string map, the effective-configuration carrier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a key, keeping its original position on replace
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Read and parse a properties file
    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Parse properties text
    pub fn parse(text: &str) -> Self {
        let mut props = Properties::new();
        let mut lines = text.lines();
        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let mut logical = trimmed.to_string();
            while ends_with_odd_backslashes(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }
            let (key, value) = split_entry(&logical);
            props.set(key, value);
        }
        props
    }

    /// Serialize to properties text; `parse` of the result reproduces the map
    pub fn store(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            out.push_str(&escape_key(key));
            out.push('=');
            out.push_str(&escape_value(value));
            out.push('\n');
        }
        out
    }
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split one logical line into key and value.
///
/// The key ends at the first unescaped `=`, `:`, or whitespace; a
/// whitespace separator may still be followed by an explicit `=`/`:`.
fn split_entry(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut separator = None;
    let mut chars = line.char_indices();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => key.push(unescape_char(escaped)),
                None => break,
            },
            '=' | ':' => {
                separator = Some((index + ch.len_utf8(), true));
                break;
            }
            c if c.is_whitespace() => {
                separator = Some((index + c.len_utf8(), false));
                break;
            }
            c => key.push(c),
        }
    }
    let Some((rest_start, explicit)) = separator else {
        return (key, String::new());
    };
    let mut rest = line[rest_start..].trim_start();
    if !explicit && (rest.starts_with('=') || rest.starts_with(':')) {
        rest = rest[1..].trim_start();
    }
    (key, unescape(rest))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(unescape_char(escaped));
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn unescape_char(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

fn escape_key(key: &str) -> String {
    let mut out = String::new();
    for ch in key.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '=' | ':' => {
                out.push('\\');
                out.push(ch);
            }
            c if c.is_whitespace() => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    // comment markers only matter at line start
    if out.starts_with('#') || out.starts_with('!') {
        out.insert(0, '\\');
    }
    out
}

fn escape_value(value: &str) -> String {
    let mut out = String::new();
    for (index, ch) in value.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if index == 0 && c.is_whitespace() => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic_pairs() {
        let props = Properties::parse("a=1\nb: 2\nc 3\n");
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let props = Properties::parse("# comment\n! also a comment\n\n  # indented comment\nkey=value\n");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("key"), Some("value"));
    }

    #[test]
    fn test_separator_with_surrounding_whitespace() {
        let props = Properties::parse("key  =  spaced value\nother : x\n");
        assert_eq!(props.get("key"), Some("spaced value"));
        assert_eq!(props.get("other"), Some("x"));
    }

    #[test]
    fn test_line_continuation() {
        let props = Properties::parse("annotators=tokenize,\\\n    ssplit\n");
        assert_eq!(props.get("annotators"), Some("tokenize,ssplit"));
    }

    #[test]
    fn test_escaped_backslash_is_not_a_continuation() {
        let props = Properties::parse("path=C\\\\\nnext=1\n");
        assert_eq!(props.get("path"), Some("C\\"));
        assert_eq!(props.get("next"), Some("1"));
    }

    #[test]
    fn test_escape_sequences() {
        let props = Properties::parse("tab=a\\tb\nkey\\=eq=v\nnewline=a\\nb\n");
        assert_eq!(props.get("tab"), Some("a\tb"));
        assert_eq!(props.get("key=eq"), Some("v"));
        assert_eq!(props.get("newline"), Some("a\nb"));
    }

    #[test]
    fn test_key_without_value() {
        let props = Properties::parse("bare\n");
        assert_eq!(props.get("bare"), Some(""));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let props = Properties::parse("z=1\na=2\nm=3\n");
        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let props = Properties::parse("a=1\nb=2\na=3\n");
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("a"), Some("3"));
        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_set_get_remove() {
        let mut props = Properties::new();
        props.set("port", "9900");
        props.set("port", "9901");
        assert_eq!(props.len(), 1);
        assert_eq!(props.remove("port"), Some("9901".to_string()));
        assert!(props.is_empty());
        assert_eq!(props.remove("port"), None);
    }

    #[test]
    fn test_store_then_parse_round_trip() {
        let mut props = Properties::new();
        props.set("annotators", "tokenize, ssplit");
        props.set("weird key", "value with = and : inside");
        props.set("#commentish", "!bang");
        props.set("multi", "line one\nline two");
        props.set("", " leading space");
        assert_eq!(Properties::parse(&props.store()), props);
    }

    proptest! {
        #[test]
        fn prop_round_trip(entries in proptest::collection::vec((".*", ".*"), 0..8)) {
            let mut props = Properties::new();
            for (key, value) in entries {
                props.set(key, value);
            }
            prop_assert_eq!(Properties::parse(&props.store()), props);
        }
    }
}
