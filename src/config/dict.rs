//! In-memory `section -> entry -> value` configuration.

use std::collections::BTreeMap;

use serde::Serialize;
use toml::{Table, Value};

use super::key::{Key, DEFAULT_SECTION};
use super::source::{Finder, NotFound};
use super::ConfigError;

pub type SectionMap = BTreeMap<String, BTreeMap<String, String>>;

/// Finder over a fixed two-level mapping.
///
/// Bare keys are looked up in the default section (`DEFAULT` unless changed
/// with [`with_default_section`](Self::with_default_section)). Entries are
/// case-insensitive and stored lower-cased; section names are exact.
///
/// ```
/// use getconf::{Finder, Key, SectionDictFinder};
///
/// let finder = SectionDictFinder::new()
///     .with_value("DEFAULT", "foo", "bar")
///     .with_value("db", "password", "S3cr3t");
///
/// assert_eq!(finder.find(&Key::parse("foo")).as_deref(), Ok("bar"));
/// assert_eq!(finder.find(&Key::parse("db.password")).as_deref(), Ok("S3cr3t"));
/// ```
#[derive(Debug, Clone)]
pub struct SectionDictFinder {
    data: SectionMap,
    default_section: String,
}

impl Default for SectionDictFinder {
    fn default() -> Self {
        Self::from_map(SectionMap::new())
    }
}

impl SectionDictFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(data: SectionMap) -> Self {
        let data: SectionMap = data
            .into_iter()
            .map(|(section, entries)| {
                let entries: BTreeMap<String, String> = entries
                    .into_iter()
                    .map(|(entry, value)| (entry.to_lowercase(), value))
                    .collect();
                (section, entries)
            })
            .collect();
        Self {
            data,
            default_section: DEFAULT_SECTION.to_string(),
        }
    }

    /// Builds the mapping from a TOML table.
    ///
    /// Top-level scalars land in the default section and top-level tables
    /// become sections. Scalars are stored in their string form and arrays of
    /// scalars are joined with `", "`, so they read back with `getlist`.
    /// Tables nested below a section are rejected.
    pub fn from_toml(table: &Table) -> Result<Self, ConfigError> {
        let mut data = SectionMap::new();

        for (name, value) in table {
            match value {
                Value::Table(section) => {
                    let entries = data.entry(name.clone()).or_default();
                    for (entry, value) in section {
                        let path = format!("{name}.{entry}");
                        entries.insert(entry.clone(), value_to_string(value, &path)?);
                    }
                }
                value => {
                    data.entry(DEFAULT_SECTION.to_string())
                        .or_default()
                        .insert(name.clone(), value_to_string(value, name)?);
                }
            }
        }

        Ok(Self::from_map(data))
    }

    /// Builds the mapping from any value serializable as a TOML table, e.g. a
    /// struct of defaults with one nested struct per section.
    pub fn from_serializable<T: Serialize + ?Sized>(defaults: &T) -> Result<Self, ConfigError> {
        match Value::try_from(defaults)? {
            Value::Table(table) => Self::from_toml(&table),
            other => Err(ConfigError::InvalidDefaults {
                reason: format!(
                    "expected a table of sections, got {}",
                    other.type_str()
                ),
            }),
        }
    }

    pub fn with_value(
        mut self,
        section: impl Into<String>,
        entry: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        let entry: String = entry.into();
        self.data
            .entry(section.into())
            .or_default()
            .insert(entry.to_lowercase(), value.to_string());
        self
    }

    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    pub fn data(&self) -> &SectionMap {
        &self.data
    }
}

impl Finder for SectionDictFinder {
    fn find(&self, key: &Key<'_>) -> Result<String, NotFound> {
        let section = key.section().unwrap_or(self.default_section.as_str());
        self.data
            .get(section)
            .and_then(|entries| entries.get(&key.entry().to_lowercase()))
            .cloned()
            .ok_or(NotFound)
    }

    fn name(&self) -> &str {
        "defaults"
    }
}

/// Converts a TOML value to its string representation.
fn value_to_string(value: &Value, path: &str) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Table(_) => Err(nested_error(path)),
                item => value_to_string(item, path),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|items| items.join(", ")),
        Value::Table(_) => Err(nested_error(path)),
    }
}

fn nested_error(path: &str) -> ConfigError {
    ConfigError::InvalidKey {
        key: path.to_string(),
        reason: "defaults support a single level of sections".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(finder: &SectionDictFinder, key: &str) -> Result<String, NotFound> {
        finder.find(&Key::parse(key))
    }

    #[test]
    fn test_bare_key_uses_default_section() {
        let finder = SectionDictFinder::new()
            .with_value("DEFAULT", "foo", "bar")
            .with_value("db", "password", "S3cr3t");

        assert_eq!(find(&finder, "foo").as_deref(), Ok("bar"));
        assert_eq!(find(&finder, "DEFAULT.foo").as_deref(), Ok("bar"));
        assert_eq!(find(&finder, "db.password").as_deref(), Ok("S3cr3t"));
        assert_eq!(find(&finder, "any_ot.her_key"), Err(NotFound));
        assert_eq!(find(&finder, "missing"), Err(NotFound));
    }

    #[test]
    fn test_custom_default_section() {
        let finder = SectionDictFinder::new()
            .with_value("general", "debug", true)
            .with_default_section("general");

        assert_eq!(find(&finder, "debug").as_deref(), Ok("true"));
    }

    #[test]
    fn test_from_toml() {
        let table: Table = toml::from_str(
            r#"
            secret_key = "changeme"

            [db]
            host = "default-host"
            port = 5432
            replicas = ["r1", "r2"]
            "#,
        )
        .unwrap();

        let finder = SectionDictFinder::from_toml(&table).unwrap();

        assert_eq!(find(&finder, "secret_key").as_deref(), Ok("changeme"));
        assert_eq!(find(&finder, "db.host").as_deref(), Ok("default-host"));
        assert_eq!(find(&finder, "db.port").as_deref(), Ok("5432"));
        assert_eq!(find(&finder, "db.replicas").as_deref(), Ok("r1, r2"));
    }

    #[test]
    fn test_from_toml_rejects_nested_tables() {
        let table: Table = toml::from_str(
            r#"
            [db.primary]
            host = "x"
            "#,
        )
        .unwrap();

        let result = SectionDictFinder::from_toml(&table);
        assert!(matches!(result, Err(ConfigError::InvalidKey { ref key, .. }) if key == "db.primary"));
    }

    #[test]
    fn test_entries_are_case_insensitive() {
        let finder = SectionDictFinder::new().with_value("db", "Host", "h");

        assert_eq!(find(&finder, "db.host").as_deref(), Ok("h"));
        assert_eq!(find(&finder, "db.HOST").as_deref(), Ok("h"));
        assert_eq!(find(&finder, "DB.host"), Err(NotFound));

        let mut data = SectionMap::new();
        data.entry("db".to_string())
            .or_default()
            .insert("Port".to_string(), "5432".to_string());
        let finder = SectionDictFinder::from_map(data);
        assert_eq!(find(&finder, "db.port").as_deref(), Ok("5432"));
        assert!(finder.data()["db"].contains_key("port"));
    }

    #[test]
    fn test_from_serializable_rejects_scalars() {
        let err = SectionDictFinder::from_serializable(&42i64).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidDefaults { .. }));
        let message = err.to_string();
        assert!(message.contains("integer"), "{message}");
        assert!(message.contains("table"), "{message}");
    }

    #[test]
    fn test_from_serializable() {
        #[derive(Serialize)]
        struct Defaults {
            debug: bool,
            db: Db,
        }

        #[derive(Serialize)]
        struct Db {
            host: String,
            timeout: String,
        }

        let finder = SectionDictFinder::from_serializable(&Defaults {
            debug: false,
            db: Db {
                host: "localhost".into(),
                timeout: "30s".into(),
            },
        })
        .unwrap();

        assert_eq!(find(&finder, "debug").as_deref(), Ok("false"));
        assert_eq!(find(&finder, "db.host").as_deref(), Ok("localhost"));
        assert_eq!(find(&finder, "db.timeout").as_deref(), Ok("30s"));
    }
}
