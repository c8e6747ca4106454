use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid config key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("bad default for '{key}' (expected {expected}): {reason}")]
    BadDefaultType {
        key: String,
        expected: &'static str,
        reason: String,
    },

    #[error("cannot read '{key}' = {raw:?} as {expected}: {reason}")]
    TypeCoercion {
        key: String,
        raw: String,
        expected: &'static str,
        reason: String,
    },

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("invalid defaults: {reason}")]
    InvalidDefaults { reason: String },

    #[error("failed to serialize defaults: {0}")]
    Serialize(#[from] toml::ser::Error),
}
