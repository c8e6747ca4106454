//! INI documents: `[section]` headers with `key = value` entries.
//!
//! The dialect follows Python's `configparser` without interpolation:
//! - `=` or `:` separates key and value; both sides are trimmed
//! - keys are case-insensitive (stored lower-cased), sections are not
//! - lines starting with `#` or `;` are comments; inline comments are kept as
//!   part of the value
//! - an indented line continues the previous value, joined with `\n`; blank
//!   lines between continuation lines are kept, trailing ones are dropped
//! - every entry must live under a section header; `[DEFAULT]` holds the
//!   fallback values of every other section
//! - a section may be declared once per document and an option once per
//!   section (later files may still override earlier ones, see
//!   [`IniDocument::merge`])

use std::collections::BTreeMap;

use super::key::DEFAULT_SECTION;

/// Syntax error found while parsing, with a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// A parsed (possibly merged) INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let mut doc = Self::new();
        let mut section: Option<String> = None;
        // Key of the value that indented lines keep extending.
        let mut open_entry: Option<String> = None;
        // Blank lines seen since the last line of the open value.
        let mut pending_blanks = 0;

        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if open_entry.is_some() {
                    pending_blanks += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = line.starts_with(|c: char| c.is_whitespace());
            if indented {
                if let (Some(name), Some(entry)) = (&section, &open_entry) {
                    if let Some(value) = doc
                        .sections
                        .get_mut(name)
                        .and_then(|entries| entries.get_mut(entry))
                    {
                        if !value.is_empty() {
                            value.push_str(&"\n".repeat(pending_blanks + 1));
                        }
                        value.push_str(trimmed);
                    }
                    pending_blanks = 0;
                    continue;
                }
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| SyntaxError {
                        line: lineno,
                        message: format!("malformed section header: {trimmed}"),
                    })?;
                if doc.sections.contains_key(name) {
                    return Err(SyntaxError {
                        line: lineno,
                        message: format!("section '{name}' already declared"),
                    });
                }
                doc.sections.insert(name.to_string(), BTreeMap::new());
                section = Some(name.to_string());
                open_entry = None;
                pending_blanks = 0;
                continue;
            }

            let Some(name) = &section else {
                return Err(SyntaxError {
                    line: lineno,
                    message: "entry outside of any section header".to_string(),
                });
            };

            let (key, value) = split_entry(trimmed).ok_or_else(|| SyntaxError {
                line: lineno,
                message: format!("expected 'key = value', found: {trimmed}"),
            })?;

            let entries = doc.sections.entry(name.clone()).or_default();
            if entries.contains_key(&key) {
                return Err(SyntaxError {
                    line: lineno,
                    message: format!("option '{key}' in section '{name}' already declared"),
                });
            }
            entries.insert(key.clone(), value.to_string());
            open_entry = Some(key);
            pending_blanks = 0;
        }

        Ok(doc)
    }

    /// Overlays `other` on top of `self`: entries of `other` win.
    pub fn merge(&mut self, other: IniDocument) {
        for (name, entries) in other.sections {
            self.sections.entry(name).or_default().extend(entries);
        }
    }

    /// Looks up `entry` in `section`, falling back to `[DEFAULT]`.
    ///
    /// A section that was never declared yields `None` even when `[DEFAULT]`
    /// carries the entry.
    pub fn get(&self, section: &str, entry: &str) -> Option<&str> {
        let entry = entry.to_lowercase();
        let defaults = || self.sections.get(DEFAULT_SECTION)?.get(&entry);

        let value = if section == DEFAULT_SECTION {
            defaults()
        } else {
            self.sections
                .get(section)?
                .get(&entry)
                .or_else(defaults)
        };
        value.map(String::as_str)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(BTreeMap::is_empty)
    }
}

fn split_entry(line: &str) -> Option<(String, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_lowercase(), line[pos + 1..].trim()))
}
