//! Environment variable lookups.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::key::Key;
use super::source::{Finder, NotFound};

/// Read access to a set of environment variables.
///
/// The process environment is one implementation ([`ProcessEnv`]); in-memory
/// maps are another, which lets callers and tests resolve configuration
/// without touching the real environment.
pub trait Environment: Send + Sync + fmt::Debug {
    fn var(&self, name: &str) -> Option<String>;
}

/// The live process environment.
///
/// Every lookup reads the environment again, so changes made after a getter
/// is built are visible to it. Variables that are not valid unicode are
/// treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Prefix applied to the environment variables of one application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Variables are named `<NAMESPACE>_<SECTION>_<ENTRY>`.
    Named(String),
    /// Variables are named `<SECTION>_<ENTRY>`.
    None,
}

impl Namespace {
    /// Name of the variable holding `args` joined under this namespace.
    ///
    /// Segments are upper-cased and every character that is not ASCII
    /// alphanumeric becomes `_`. Distinct keys may therefore share a variable
    /// (`my-key` and `my_key` both map to `..._MY_KEY`).
    pub fn var_name(&self, args: &[&str]) -> String {
        let prefix = match self {
            Namespace::Named(name) => Some(name.as_str()),
            Namespace::None => None,
        };
        prefix
            .into_iter()
            .chain(args.iter().copied())
            .map(normalize)
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl From<&str> for Namespace {
    fn from(name: &str) -> Self {
        Namespace::Named(name.to_string())
    }
}

impl From<String> for Namespace {
    fn from(name: String) -> Self {
        Namespace::Named(name)
    }
}

fn normalize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Finds `section.entry` in `<NAMESPACE>_<SECTION>_<ENTRY>`, and bare
/// `entry` in `<NAMESPACE>_<ENTRY>`.
#[derive(Debug, Clone)]
pub struct EnvFinder {
    namespace: Namespace,
    env: Arc<dyn Environment>,
}

impl EnvFinder {
    /// Reads from the process environment.
    pub fn new(namespace: impl Into<Namespace>) -> Self {
        Self::with_environment(namespace, Arc::new(ProcessEnv))
    }

    pub fn with_environment(namespace: impl Into<Namespace>, env: Arc<dyn Environment>) -> Self {
        Self {
            namespace: namespace.into(),
            env,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn var_name(&self, key: &Key<'_>) -> String {
        match key.section() {
            Some(section) => self.namespace.var_name(&[section, key.entry()]),
            None => self.namespace.var_name(&[key.entry()]),
        }
    }
}

impl Finder for EnvFinder {
    fn find(&self, key: &Key<'_>) -> Result<String, NotFound> {
        self.env.var(&self.var_name(key)).ok_or(NotFound)
    }

    fn name(&self) -> &str {
        "environment"
    }

    fn env_var_name(&self, key: &Key<'_>) -> Option<String> {
        Some(self.var_name(key))
    }
}
