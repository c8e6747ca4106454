//! Expansion of configuration file lists.
//!
//! Each entry of a list is one of:
//! - a directory, replaced by its non-hidden files in name order
//! - a glob pattern, replaced by its non-hidden matches in name order
//! - anything else, kept as a literal path (it need not exist)
//!
//! Expansions are spliced in at the position of the entry they replace, so the
//! relative order of the original entries is preserved.

use std::path::{Path, PathBuf};

use glob::MatchOptions;
use tracing::debug;

use super::ConfigError;

const GLOB_META: [char; 3] = ['*', '?', '['];

/// Expands directories and glob patterns into a flat, ordered file list.
///
/// Empty entries are skipped and a leading `~` is replaced by the home
/// directory.
pub fn expand_paths<I, P>(entries: I) -> Result<Vec<PathBuf>, ConfigError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.as_ref();
        if entry.as_os_str().is_empty() {
            continue;
        }

        let path = expand_home(entry);
        if path.is_dir() {
            let children = list_directory(&path)?;
            debug!(dir = %path.display(), count = children.len(), "expanded config directory");
            files.extend(children);
        } else if is_glob(&path) {
            let matches = expand_glob(&path)?;
            debug!(pattern = %path.display(), count = matches.len(), "expanded config glob");
            files.extend(matches);
        } else {
            files.push(path);
        }
    }

    Ok(files)
}

/// Lists the regular, non-hidden files directly inside `dir`, sorted by name.
pub fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let read_error = |source| ConfigError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Expands a glob pattern into its matching files, sorted.
///
/// As with shell globbing, wildcards do not match a leading `.`.
pub fn expand_glob(pattern: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let pattern = pattern.to_string_lossy();
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let paths = glob::glob_with(&pattern, options).map_err(|source| ConfigError::Glob {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for path in paths {
        match path {
            Ok(path) if !path.is_dir() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!(path = %e.path().display(), error = %e.error(), "skipping unreadable glob match"),
        }
    }

    files.sort();
    Ok(files)
}

fn is_glob(path: &Path) -> bool {
    path.to_string_lossy().contains(GLOB_META)
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
