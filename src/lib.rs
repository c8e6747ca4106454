//! Configuration lookups layered over environment variables, INI files and
//! in-memory defaults.
//!
//! ```no_run
//! use getconf::{ConfigGetter, SectionDictFinder};
//!
//! let config = ConfigGetter::new(
//!     "myproj",
//!     ["/etc/myproj/settings.ini", "/etc/myproj/conf.d"],
//!     SectionDictFinder::new().with_value("db", "host", "localhost"),
//! )?;
//!
//! // MYPROJ_DB_HOST, then [db] host in the files, then the defaults.
//! let host = config.getstr("db.host", None, "Database host")?;
//! # Ok::<(), getconf::ConfigError>(())
//! ```

pub mod config;

pub use config::{
    BaseConfigGetter, ConfigEnum, ConfigError, ConfigGetter, ConfigGetterBuilder, ConfigKey,
    ConfigValue, ContentFileFinder, EnvFinder, Environment, Finder, Key, MultiFileFinder,
    Namespace, NotFound, ProcessEnv, SectionDictFinder, SectionView,
};
