//! Layered configuration lookups.

mod builder;
mod content;
mod dict;
mod env;
mod error;
mod expand;
mod file;
mod getter;
mod ini;
mod key;
mod source;
mod template;
mod value;

pub use builder::{ConfigGetter, ConfigGetterBuilder};
pub use content::ContentFileFinder;
pub use dict::{SectionDictFinder, SectionMap};
pub use env::{EnvFinder, Environment, Namespace, ProcessEnv};
pub use error::ConfigError;
pub use expand::{expand_glob, expand_paths, list_directory};
pub use file::MultiFileFinder;
pub use getter::{BaseConfigGetter, SectionView};
pub use ini::{IniDocument, SyntaxError};
pub use key::{require_section, Key, KeyValidator, DEFAULT_SECTION};
pub use source::{Finder, NotFound};
pub use template::{render_ini_template, ConfigKey};
pub use value::{format_duration, parse_duration, ConfigEnum, ConfigValue};
