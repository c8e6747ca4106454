use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::dict::SectionDictFinder;
use super::env::{EnvFinder, Environment, Namespace, ProcessEnv};
use super::file::MultiFileFinder;
use super::getter::BaseConfigGetter;
use super::key::require_section;
use super::source::Finder;
use super::ConfigError;

/// The usual getter for an application.
///
/// A key is looked up, in order, in:
/// 1. the environment: `db.host` in `<NAMESPACE>_DB_HOST`, `debug` in
///    `<NAMESPACE>_DEBUG`
/// 2. the file or directory named by `<NAMESPACE>_CONFIG`, if set
/// 3. the configured files (directories and globs allowed; later files win)
/// 4. the in-memory defaults
///
/// and finally falls back to the default given at the call site. Typed
/// lookups are available through [`BaseConfigGetter`], which this type
/// dereferences to.
///
/// ## Example
///
/// ```no_run
/// use getconf::ConfigGetter;
///
/// let config = ConfigGetter::builder("myproj")
///     .with_file("/etc/myproj/settings.ini")
///     .with_file("/etc/myproj/conf.d")
///     .build()?;
///
/// let host = config.getstr("db.host", Some("localhost"), "Database host")?;
/// let debug = config.getbool("debug", Some(false), "Enable debug mode")?;
/// # Ok::<(), getconf::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct ConfigGetter {
    namespace: Namespace,
    getter: BaseConfigGetter,
    search_files: Vec<PathBuf>,
    found_files: Vec<PathBuf>,
}

impl ConfigGetter {
    /// Creates a new configuration builder.
    pub fn builder(namespace: impl Into<Namespace>) -> ConfigGetterBuilder {
        ConfigGetterBuilder {
            namespace: namespace.into(),
            config_files: Vec::new(),
            defaults: SectionDictFinder::new(),
            env: Arc::new(ProcessEnv),
            mandatory_section: false,
        }
    }

    /// Builds a getter reading the process environment.
    pub fn new<I, P>(
        namespace: impl Into<Namespace>,
        config_files: I,
        defaults: SectionDictFinder,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::builder(namespace)
            .with_files(config_files)
            .with_defaults(defaults)
            .build()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Files considered, in precedence order: the files named by
    /// `<NAMESPACE>_CONFIG` first, then the configured ones.
    pub fn search_files(&self) -> &[PathBuf] {
        &self.search_files
    }

    /// The subset of [`search_files`](Self::search_files) that was loaded.
    pub fn found_files(&self) -> &[PathBuf] {
        &self.found_files
    }
}

impl Deref for ConfigGetter {
    type Target = BaseConfigGetter;

    fn deref(&self) -> &BaseConfigGetter {
        &self.getter
    }
}

/// Builder for a [`ConfigGetter`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigGetterBuilder {
    namespace: Namespace,
    config_files: Vec<PathBuf>,
    defaults: SectionDictFinder,
    env: Arc<dyn Environment>,
    mandatory_section: bool,
}

impl ConfigGetterBuilder {
    /// Adds a file, directory or glob pattern to read.
    ///
    /// Files are merged in registration order, so later files override
    /// earlier ones. Missing files are silently skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.config_files
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Sets the values used when neither the environment nor any file
    /// defines a key.
    pub fn with_defaults(mut self, defaults: SectionDictFinder) -> Self {
        self.defaults = defaults;
        self
    }

    /// Reads variables from `env` instead of the process environment.
    ///
    /// This covers both key lookups and `<NAMESPACE>_CONFIG`.
    pub fn with_environment(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = env;
        self
    }

    /// Rejects keys without a section (`"debug"` rather than `"app.debug"`).
    pub fn mandatory_section(mut self, mandatory: bool) -> Self {
        self.mandatory_section = mandatory;
        self
    }

    /// Reads every configured file and assembles the finder chain.
    pub fn build(self) -> Result<ConfigGetter, ConfigError> {
        let env_finder = EnvFinder::with_environment(self.namespace.clone(), Arc::clone(&self.env));

        let config_var = self.namespace.var_name(&["config"]);
        let env_files = match self.env.var(&config_var).filter(|path| !path.is_empty()) {
            Some(path) => {
                debug!(var = %config_var, %path, "using config path from environment");
                Some(MultiFileFinder::new([path])?)
            }
            None => None,
        };
        let declared_files = MultiFileFinder::new(&self.config_files)?;

        let mut search_files = Vec::new();
        let mut found_files = Vec::new();
        for finder in env_files.iter().chain([&declared_files]) {
            search_files.extend_from_slice(finder.search_files());
            found_files.extend_from_slice(finder.loaded_files());
        }

        let mut finders: Vec<Box<dyn Finder>> = vec![Box::new(env_finder)];
        if let Some(finder) = env_files {
            finders.push(Box::new(finder));
        }
        finders.push(Box::new(declared_files));
        finders.push(Box::new(self.defaults));

        let mut getter = BaseConfigGetter::new(finders);
        if self.mandatory_section {
            getter = getter.with_key_validator(require_section());
        }

        Ok(ConfigGetter {
            namespace: self.namespace,
            getter,
            search_files,
            found_files,
        })
    }
}
