//! Config module (modularized).
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{
    ConfigSource, default_config_path, default_log_path, path_has_symlink_ancestor,
    resolve_config_source,
};
pub use types::{BatchLimit, Config, LogLevel, Settings, ShareSettings};
pub use validate::{parse_bool, preflight_paths};
pub use xml::{ConfigFile, LoadResult, RawSection, create_template_config, load_or_init};

/// Section used when none is chosen on the command line; other sections inherit from it.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MOVE_FILES_CONFIG";
