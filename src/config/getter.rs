//! Ordered finder chains and typed lookups on top of them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::key::{self, Key, KeyValidator, DEFAULT_SECTION};
use super::source::Finder;
use super::template::{render_ini_template, ConfigKey};
use super::value::{ConfigEnum, ConfigValue};
use super::ConfigError;

/// Resolves keys against an ordered list of finders.
///
/// The first finder that knows a key wins, so precedence is entirely a matter
/// of construction order. Every typed lookup is recorded, which allows
/// rendering a documented INI template of the keys a program reads with
/// [`get_ini_template`](Self::get_ini_template).
///
/// Lookups only need `&self`; the getter can be shared between threads.
pub struct BaseConfigGetter {
    finders: Vec<Box<dyn Finder>>,
    key_validator: Option<KeyValidator>,
    seen_keys: Mutex<KeyLog>,
}

/// The first lookup of each `(section, entry)`, in first-use order.
#[derive(Debug, Default)]
struct KeyLog {
    records: Vec<ConfigKey>,
    index: HashMap<String, HashSet<String>>,
}

impl KeyLog {
    fn contains(&self, section: &str, entry: &str) -> bool {
        self.index
            .get(section)
            .is_some_and(|entries| entries.contains(entry))
    }

    fn push(&mut self, record: ConfigKey) {
        self.index
            .entry(record.section.clone())
            .or_default()
            .insert(record.entry.clone());
        self.records.push(record);
    }
}

impl fmt::Debug for BaseConfigGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseConfigGetter")
            .field("finders", &self.finders)
            .field("key_validator", &self.key_validator.is_some())
            .finish_non_exhaustive()
    }
}

impl BaseConfigGetter {
    /// Creates a getter querying `finders` in order.
    pub fn new(finders: Vec<Box<dyn Finder>>) -> Self {
        Self {
            finders,
            key_validator: None,
            seen_keys: Mutex::new(KeyLog::default()),
        }
    }

    /// Rejects keys failing `validator` with [`ConfigError::InvalidKey`].
    #[must_use]
    pub fn with_key_validator(mut self, validator: KeyValidator) -> Self {
        self.key_validator = Some(validator);
        self
    }

    pub fn finders(&self) -> &[Box<dyn Finder>] {
        &self.finders
    }

    /// Returns the raw value of `key` from the first finder holding it.
    ///
    /// `Ok(None)` means no finder knows the key. Lookups made through this
    /// method are not recorded for the INI template.
    pub fn resolve(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let parsed = Key::parse(key);
        key::validate(self.key_validator.as_ref(), key, &parsed)?;
        Ok(self.find(&parsed))
    }

    fn find(&self, key: &Key<'_>) -> Option<String> {
        for finder in &self.finders {
            match finder.find(key) {
                Ok(value) => {
                    debug!(%key, source = finder.name(), "resolved config key");
                    return Some(value);
                }
                Err(_) => trace!(%key, source = finder.name(), "config key not found"),
            }
        }
        None
    }

    /// Looks `key` up and reads it as a `T`.
    ///
    /// Returns `default` when no finder knows the key, and
    /// [`ConfigError::TypeCoercion`] when the value found cannot be read as
    /// a `T`.
    pub fn get<T: ConfigValue>(
        &self,
        key: &str,
        default: Option<T>,
        doc: &str,
    ) -> Result<Option<T>, ConfigError> {
        let rendered = default.as_ref().map(T::render);
        self.lookup(key, T::TYPE_NAME, rendered, doc, T::parse_raw, default)
    }

    pub fn getstr(
        &self,
        key: &str,
        default: Option<&str>,
        doc: &str,
    ) -> Result<Option<String>, ConfigError> {
        self.get(key, default.map(str::to_string), doc)
    }

    pub fn getbool(
        &self,
        key: &str,
        default: Option<bool>,
        doc: &str,
    ) -> Result<Option<bool>, ConfigError> {
        self.get(key, default, doc)
    }

    pub fn getint(
        &self,
        key: &str,
        default: Option<i64>,
        doc: &str,
    ) -> Result<Option<i64>, ConfigError> {
        self.get(key, default, doc)
    }

    pub fn getfloat(
        &self,
        key: &str,
        default: Option<f64>,
        doc: &str,
    ) -> Result<Option<f64>, ConfigError> {
        self.get(key, default, doc)
    }

    /// Reads a comma-separated list; items are trimmed and empty ones dropped.
    pub fn getlist(
        &self,
        key: &str,
        default: Option<Vec<String>>,
        doc: &str,
    ) -> Result<Option<Vec<String>>, ConfigError> {
        self.get(key, default, doc)
    }

    /// Reads a duration such as `10d`, `3h` or `1h30m`.
    pub fn gettimedelta(
        &self,
        key: &str,
        default: Option<Duration>,
        doc: &str,
    ) -> Result<Option<Duration>, ConfigError> {
        self.get(key, default, doc)
    }

    /// Reads a filesystem path. The path is not required to exist.
    pub fn getpath(
        &self,
        key: &str,
        default: Option<PathBuf>,
        doc: &str,
    ) -> Result<Option<PathBuf>, ConfigError> {
        self.get(key, default, doc)
    }

    /// Reads a member of `E`.
    ///
    /// The default must be one of `E::members()`, which is checked on every
    /// call rather than when `E` is declared.
    pub fn getenum<E: ConfigEnum>(
        &self,
        key: &str,
        default: Option<E>,
        doc: &str,
    ) -> Result<Option<E>, ConfigError> {
        if let Some(value) = &default {
            if !E::members().contains(value) {
                return Err(ConfigError::BadDefaultType {
                    key: key.to_string(),
                    expected: "enum",
                    reason: format!("'{}' is not a member of the enumeration", value.name()),
                });
            }
        }

        let rendered = default.as_ref().map(|value| value.name().to_string());
        let parse = |raw: &str| {
            E::from_raw(raw).ok_or_else(|| {
                let names: Vec<&str> = E::members().iter().map(|m| m.name()).collect();
                format!("expected one of {}", names.join(", "))
            })
        };
        self.lookup(key, "enum", rendered, doc, parse, default)
    }

    fn lookup<T>(
        &self,
        raw_key: &str,
        type_name: &'static str,
        rendered_default: Option<String>,
        doc: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
        default: Option<T>,
    ) -> Result<Option<T>, ConfigError> {
        let key = Key::parse(raw_key);
        key::validate(self.key_validator.as_ref(), raw_key, &key)?;
        self.record(&key, type_name, rendered_default, doc);

        match self.find(&key) {
            Some(raw) => parse(&raw).map(Some).map_err(|reason| ConfigError::TypeCoercion {
                key: raw_key.to_string(),
                raw,
                expected: type_name,
                reason,
            }),
            None => Ok(default),
        }
    }

    /// Logs the first lookup of a key; repeated lookups keep the first record.
    fn record(&self, key: &Key<'_>, type_name: &'static str, default: Option<String>, doc: &str) {
        let section = key.section_or(DEFAULT_SECTION);
        let mut log = self.seen_keys.lock();
        if log.contains(section, key.entry()) {
            return;
        }
        let env_var = self.finders.iter().find_map(|f| f.env_var_name(key));
        log.push(ConfigKey {
            section: section.to_string(),
            entry: key.entry().to_string(),
            env_var,
            type_name,
            default,
            doc: doc.to_string(),
        });
    }

    /// Returns a read-only view of one section.
    pub fn get_section<'a>(&'a self, name: &str) -> SectionView<'a> {
        SectionView {
            getter: self,
            section: name.to_string(),
        }
    }

    /// Every distinct key looked up so far, sorted.
    pub fn list_keys(&self) -> Vec<ConfigKey> {
        let mut keys = self.seen_keys.lock().records.clone();
        keys.sort();
        keys
    }

    /// Renders an INI template documenting every key looked up so far.
    pub fn get_ini_template(&self) -> String {
        render_ini_template(&self.seen_keys.lock().records)
    }
}

/// String lookups scoped to one section.
///
/// `view.get("host")` is `getter.getstr("<section>.host", None, "")`. The view
/// has no notion of which keys exist, so it cannot be iterated.
#[derive(Debug, Clone)]
pub struct SectionView<'a> {
    getter: &'a BaseConfigGetter,
    section: String,
}

impl SectionView<'_> {
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.getter
            .getstr(&format!("{}.{}", self.section, key), None, "")
    }

    pub fn section(&self) -> &str {
        &self.section
    }
}
