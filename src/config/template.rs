//! Documentation of the keys a program reads, rendered as an INI template.

use std::fmt::Write;

use serde::Serialize;

use super::key::DEFAULT_SECTION;

/// One typed lookup, as recorded by a getter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConfigKey {
    pub section: String,
    pub entry: String,
    pub env_var: Option<String>,
    pub type_name: &'static str,
    pub default: Option<String>,
    pub doc: String,
}

/// Renders an INI skeleton with one commented-out line per distinct key.
///
/// `[DEFAULT]` comes first, then the other sections in the order they were
/// first looked up. Within a section, keys keep the order of their first
/// lookup; later lookups of the same key are ignored.
///
/// ```text
/// [DEFAULT]
/// ; MYPROJ_DEBUG - type=bool - Enable debug mode
/// ;debug = false
/// ```
pub fn render_ini_template(records: &[ConfigKey]) -> String {
    let mut sections: Vec<(&str, Vec<&ConfigKey>)> = Vec::new();

    for record in records {
        let pos = match sections.iter().position(|(name, _)| *name == record.section) {
            Some(pos) => pos,
            None => {
                sections.push((record.section.as_str(), Vec::new()));
                sections.len() - 1
            }
        };
        let keys = &mut sections[pos].1;
        if !keys.iter().any(|k| k.entry == record.entry) {
            keys.push(record);
        }
    }

    // Stable, so the other sections keep their first-use order.
    sections.sort_by_key(|(name, _)| *name != DEFAULT_SECTION);

    let mut out = String::new();
    for (idx, (name, keys)) in sections.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{name}]");
        for key in keys {
            out.push(';');
            if let Some(var) = &key.env_var {
                let _ = write!(out, " {var} -");
            }
            let _ = write!(out, " type={}", key.type_name);
            if !key.doc.is_empty() {
                let _ = write!(out, " - {}", key.doc);
            }
            out.push('\n');
            let _ = writeln!(
                out,
                ";{} = {}",
                key.entry,
                key.default.as_deref().unwrap_or_default()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(section: &str, entry: &str, type_name: &'static str, default: &str, doc: &str) -> ConfigKey {
        ConfigKey {
            section: section.to_string(),
            entry: entry.to_string(),
            env_var: Some(format!("NS_{}", entry.to_uppercase())),
            type_name,
            default: Some(default.to_string()),
            doc: doc.to_string(),
        }
    }

    #[test]
    fn test_default_section_first() {
        let records = vec![
            record("section", "bar", "list", "a, b", ""),
            record("DEFAULT", "foo", "bool", "true", "Enable foo"),
        ];

        let template = render_ini_template(&records);

        assert_eq!(
            template,
            "[DEFAULT]\n\
             ; NS_FOO - type=bool - Enable foo\n\
             ;foo = true\n\
             \n\
             [section]\n\
             ; NS_BAR - type=list\n\
             ;bar = a, b\n"
        );
    }

    #[test]
    fn test_repeated_keys_rendered_once() {
        let records = vec![
            record("db", "host", "str", "localhost", "Database host"),
            record("db", "port", "int", "5432", ""),
            record("db", "host", "str", "other", ""),
        ];

        let template = render_ini_template(&records);

        assert_eq!(template.matches(";host = ").count(), 1);
        assert!(template.contains(";host = localhost\n"));
        assert!(template.find(";host").unwrap() < template.find(";port").unwrap());
    }

    #[test]
    fn test_missing_default_and_env_var() {
        let records = vec![ConfigKey {
            section: "s".to_string(),
            entry: "k".to_string(),
            env_var: None,
            type_name: "path",
            default: None,
            doc: String::new(),
        }];

        assert_eq!(render_ini_template(&records), "[s]\n; type=path\n;k = \n");
    }

    #[test]
    fn test_empty() {
        assert_eq!(render_ini_template(&[]), "");
    }
}
