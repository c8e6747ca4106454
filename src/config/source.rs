use std::fmt;

use super::key::Key;

/// Signal from a [`Finder`] that it holds no value for a key.
///
/// Never escapes a [`BaseConfigGetter`](super::BaseConfigGetter): the chain
/// moves on to the next finder and finally to the caller's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found")
    }
}

impl std::error::Error for NotFound {}

/// A single configuration source.
///
/// Finders own their backing data and are immutable once built, so a chain of
/// them can be shared between threads for read-only lookups.
///
/// Entry names match case-insensitively in every finder of this crate (the
/// environment upper-cases them, the others lower-case them). Section names
/// are matched exactly, except by the environment finder.
pub trait Finder: Send + Sync + fmt::Debug {
    fn find(&self, key: &Key<'_>) -> Result<String, NotFound>;

    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Environment variable this finder would read for `key`, if it reads any.
    ///
    /// Used to annotate generated INI templates.
    fn env_var_name(&self, _key: &Key<'_>) -> Option<String> {
        None
    }
}
