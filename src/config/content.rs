//! One-file-per-key configuration, as found in mounted secret volumes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::expand::list_directory;
use super::key::Key;
use super::source::{Finder, NotFound};
use super::ConfigError;

/// Finds a key in a file named after its entry.
///
/// `db.password` and `password` both resolve to the contents of
/// `<directory>/password`; the section is ignored and file names match
/// case-insensitively. Non-hidden files are read once, at construction; files
/// that are not valid UTF-8 (keystores, certificates in DER form) are skipped.
/// A missing directory yields an empty finder.
#[derive(Debug, Clone)]
pub struct ContentFileFinder {
    directory: PathBuf,
    contents: HashMap<String, String>,
}

impl ContentFileFinder {
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let directory = directory.as_ref().to_path_buf();
        let mut contents = HashMap::new();

        if directory.is_dir() {
            for path in list_directory(&directory)? {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let bytes = std::fs::read(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                match String::from_utf8(bytes) {
                    Ok(value) => {
                        contents.insert(name.to_lowercase(), value);
                    }
                    Err(_) => debug!(path = %path.display(), "skipping non-UTF-8 content file"),
                }
            }
        } else {
            debug!(dir = %directory.display(), "content directory not found");
        }

        Ok(Self {
            directory,
            contents,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Finder for ContentFileFinder {
    fn find(&self, key: &Key<'_>) -> Result<String, NotFound> {
        self.contents
            .get(&key.entry().to_lowercase())
            .cloned()
            .ok_or(NotFound)
    }

    fn name(&self) -> &str {
        "content files"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_file_named_after_entry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("password"), "S3cr3t\n").unwrap();

        let finder = ContentFileFinder::new(dir.path()).unwrap();

        assert_eq!(finder.find(&Key::parse("password")), Ok("S3cr3t\n".to_string()));
        assert_eq!(finder.find(&Key::parse("db.password")), Ok("S3cr3t\n".to_string()));
        assert_eq!(finder.find(&Key::parse("db.user")), Err(NotFound));
    }

    #[test]
    fn test_hidden_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".token"), "x").unwrap();

        let finder = ContentFileFinder::new(dir.path()).unwrap();

        assert_eq!(finder.find(&Key::parse(".token")), Err(NotFound));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let finder = ContentFileFinder::new("/nonexistent/secrets").unwrap();
        assert_eq!(finder.find(&Key::parse("password")), Err(NotFound));
    }

    #[test]
    fn test_binary_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keystore.p12"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("password"), "S3cr3t").unwrap();

        let finder = ContentFileFinder::new(dir.path()).unwrap();

        assert_eq!(finder.find(&Key::parse("db.password")), Ok("S3cr3t".to_string()));
        assert_eq!(finder.find(&Key::parse("keystore.p12")), Err(NotFound));
    }

    #[test]
    fn test_entries_are_case_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Password"), "S3cr3t").unwrap();

        let finder = ContentFileFinder::new(dir.path()).unwrap();

        assert_eq!(finder.find(&Key::parse("db.password")), Ok("S3cr3t".to_string()));
        assert_eq!(finder.find(&Key::parse("db.PASSWORD")), Ok("S3cr3t".to_string()));
    }
}
