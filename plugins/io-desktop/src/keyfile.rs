//! Reader and writer for the freedesktop key-file syntax.
//!
//! ```text
//! # comment
//! [Desktop Entry]
//! Type=Action
//! Name=Open terminal
//! Name[fr]=Ouvrir un terminal
//! MimeTypes=inode/directory;text/plain;
//! ```
//!
//! Values are stored raw. Typed accessors apply the `\s \n \t \r \\` escapes,
//! and list accessors split on unescaped `;`.
use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFileError {
    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Line {line}: key outside of any group")]
    EntryOutsideGroup { line: usize },

    #[error("Group '{0}' appears twice")]
    DuplicateGroup(String),
}

/// Ordered groups of ordered raw key/value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFile {
    groups: IndexMap<String, IndexMap<String, String>>,
}

impl KeyFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse key-file text; comments and blank lines are dropped
    pub fn parse(text: &str) -> Result<Self, KeyFileError> {
        let mut file = KeyFile::new();
        let mut current: Option<String> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim_start();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('[') {
                let Some(name) = rest.trim_end().strip_suffix(']') else {
                    return Err(KeyFileError::Syntax {
                        line: line_no,
                        message: "unterminated group header".to_string(),
                    });
                };
                if file.groups.contains_key(name) {
                    return Err(KeyFileError::DuplicateGroup(name.to_string()));
                }
                file.groups.insert(name.to_string(), IndexMap::new());
                current = Some(name.to_string());
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(KeyFileError::Syntax {
                    line: line_no,
                    message: format!("expected 'key=value', got '{}'", line),
                });
            };
            let key = key.trim_end();
            if key.is_empty() {
                return Err(KeyFileError::Syntax {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }
            let Some(group) = current.as_ref().and_then(|name| file.groups.get_mut(name)) else {
                return Err(KeyFileError::EntryOutsideGroup { line: line_no });
            };
            group.insert(key.to_string(), value.trim_start().to_string());
        }
        Ok(file)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Add an empty group at the end, keeping an existing one
    pub fn add_group(&mut self, group: &str) {
        if !self.groups.contains_key(group) {
            self.groups.insert(group.to_string(), IndexMap::new());
        }
    }

    pub fn remove_group(&mut self, group: &str) -> bool {
        self.groups.shift_remove(group).is_some()
    }

    pub fn raw(&self, group: &str, key: &str) -> Option<&str> {
        self.groups.get(group)?.get(key).map(String::as_str)
    }

    pub fn set_raw(&mut self, group: &str, key: &str, value: String) {
        self.add_group(group);
        if let Some(entries) = self.groups.get_mut(group) {
            entries.insert(key.to_string(), value);
        }
    }

    pub fn remove_key(&mut self, group: &str, key: &str) -> Option<String> {
        self.groups.get_mut(group)?.shift_remove(key)
    }

    /// Unescaped string value
    pub fn string(&self, group: &str, key: &str) -> Option<String> {
        self.raw(group, key).map(unescape)
    }

    /// Localized value: the best `key[locale]` match, else the plain key
    pub fn locale_string(&self, group: &str, key: &str, locale: Option<&str>) -> Option<String> {
        if let Some(locale) = locale {
            for candidate in locale_candidates(locale) {
                if let Some(value) = self.string(group, &format!("{}[{}]", key, candidate)) {
                    return Some(value);
                }
            }
        }
        self.string(group, key)
    }

    pub fn string_list(&self, group: &str, key: &str) -> Option<Vec<String>> {
        self.raw(group, key).map(split_list)
    }

    pub fn set_string(&mut self, group: &str, key: &str, value: &str) {
        self.set_raw(group, key, escape(value, false));
    }

    /// Store a list, every element followed by `;`
    pub fn set_string_list<S: AsRef<str>>(&mut self, group: &str, key: &str, values: &[S]) {
        let joined: String = values
            .iter()
            .map(|value| format!("{};", escape(value.as_ref(), true)))
            .collect();
        self.set_raw(group, key, joined);
    }
}

impl fmt::Display for KeyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, entries)) in self.groups.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", name)?;
            for (key, value) in entries {
                writeln!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Locale names to try, most specific first: `ll_CC@mod`, `ll_CC`,
/// `ll@mod`, `ll`. The encoding part is ignored.
fn locale_candidates(locale: &str) -> Vec<String> {
    let (body, modifier) = match locale.split_once('@') {
        Some((body, modifier)) => (body, Some(modifier)),
        None => (locale, None),
    };
    let body = body.split('.').next().unwrap_or(body);
    let (lang, country) = match body.split_once('_') {
        Some((lang, country)) => (lang, Some(country)),
        None => (body, None),
    };

    let mut candidates = Vec::new();
    if let (Some(country), Some(modifier)) = (country, modifier) {
        candidates.push(format!("{}_{}@{}", lang, country, modifier));
    }
    if let Some(country) = country {
        candidates.push(format!("{}_{}", lang, country));
    }
    if let Some(modifier) = modifier {
        candidates.push(format!("{}@{}", lang, modifier));
    }
    candidates.push(lang.to_string());
    candidates
}

fn escape(value: &str, in_list: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for (index, c) in value.chars().enumerate() {
        match c {
            ' ' if index == 0 => out.push_str("\\s"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            ';' if in_list => out.push_str("\\;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(';') => out.push(';'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a raw list on unescaped `;`, unescaping each element. A trailing
/// separator does not make an empty last element.
fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' => items.push(unescape(&std::mem::take(&mut current))),
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        items.push(unescape(&current));
    }
    items
}
