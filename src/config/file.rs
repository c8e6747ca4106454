//! INI file based configuration source.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::expand::expand_paths;
use super::ini::IniDocument;
use super::key::{Key, DEFAULT_SECTION};
use super::source::{Finder, NotFound};
use super::ConfigError;

/// A configuration source backed by an ordered list of INI files.
///
/// Directories and glob patterns in the list are expanded (see
/// [`expand_paths`]), then every file is parsed and merged in order: when
/// several files define the same entry, the last one wins. Missing files are
/// skipped. Files are read once, at construction.
#[derive(Debug, Clone, Default)]
pub struct MultiFileFinder {
    store: IniDocument,
    search_files: Vec<PathBuf>,
    loaded_files: Vec<PathBuf>,
}

impl MultiFileFinder {
    pub fn new<I, P>(config_files: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let search_files = expand_paths(config_files)?;
        let mut store = IniDocument::new();
        let mut loaded_files = Vec::new();

        for path in &search_files {
            if let Some(doc) = load_config_file(path)? {
                store.merge(doc);
                loaded_files.push(path.clone());
            }
        }

        info!(
            loaded = %display_paths(&loaded_files),
            searched = %display_paths(&search_files),
            "loaded configuration files"
        );

        Ok(Self {
            store,
            search_files,
            loaded_files,
        })
    }

    /// Files considered, after expansion, in merge order.
    pub fn search_files(&self) -> &[PathBuf] {
        &self.search_files
    }

    /// Files that existed and were parsed, in merge order.
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    pub fn store(&self) -> &IniDocument {
        &self.store
    }
}

impl Finder for MultiFileFinder {
    fn find(&self, key: &Key<'_>) -> Result<String, NotFound> {
        self.store
            .get(key.section_or(DEFAULT_SECTION), key.entry())
            .map(str::to_string)
            .ok_or(NotFound)
    }

    fn name(&self) -> &str {
        "files"
    }
}

/// Loads and parses an INI file.
///
/// Returns `Ok(None)` if the file doesn't exist.
fn load_config_file(path: &Path) -> Result<Option<IniDocument>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let doc = IniDocument::parse(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                line: e.line,
                message: e.message,
            })?;
            Ok(Some(doc))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            Ok(None)
        }
        Err(e) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
