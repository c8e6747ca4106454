//! Dotted `section.entry` keys.

use std::fmt;

use super::ConfigError;

/// Section holding keys looked up without a `section.` prefix.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A lookup key split on its first `.`.
///
/// `"db.host"` has section `db` and entry `host`; `"a.b.c"` has section `a`
/// and entry `b.c`. A key without a dot (or with an empty section, as in
/// `".foo"`) has no section and resolves against the default section of
/// whichever source is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key<'a> {
    section: Option<&'a str>,
    entry: &'a str,
}

impl<'a> Key<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('.') {
            Some((section, entry)) if !section.is_empty() => Self {
                section: Some(section),
                entry,
            },
            Some((_, entry)) => Self {
                section: None,
                entry,
            },
            None => Self {
                section: None,
                entry: raw,
            },
        }
    }

    pub fn new(section: Option<&'a str>, entry: &'a str) -> Self {
        Self {
            section: section.filter(|s| !s.is_empty()),
            entry,
        }
    }

    pub fn section(&self) -> Option<&'a str> {
        self.section
    }

    pub fn entry(&self) -> &'a str {
        self.entry
    }

    /// The section, or `default` for bare keys.
    pub fn section_or<'b>(&self, default: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.section.unwrap_or(default)
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.section {
            Some(section) => write!(f, "{}.{}", section, self.entry),
            None => f.write_str(self.entry),
        }
    }
}

/// Structural check run on every key before any source is queried.
///
/// Returns the rejection reason on failure.
pub type KeyValidator = Box<dyn Fn(&Key<'_>) -> Result<(), String> + Send + Sync>;

/// Rejects bare keys and keys with an empty entry.
pub fn require_section() -> KeyValidator {
    Box::new(|key| {
        if key.section().is_none() {
            return Err("a section is mandatory (use 'section.key')".to_string());
        }
        if key.entry().is_empty() {
            return Err("entry name is empty".to_string());
        }
        Ok(())
    })
}

pub(crate) fn validate(
    validator: Option<&KeyValidator>,
    raw: &str,
    key: &Key<'_>,
) -> Result<(), ConfigError> {
    match validator {
        Some(check) => check(key).map_err(|reason| ConfigError::InvalidKey {
            key: raw.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
