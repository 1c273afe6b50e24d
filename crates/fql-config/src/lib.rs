//! Configuration system for fql.
//!
//! fql uses TOML configuration files named `.fql.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.fql.toml` files found,
//! then loading `~/.fql.toml` as the global config with lowest precedence. A file with
//! `root = true` ends the walk and excludes the global config.
//!
//! The merged [`Config`] carries the [`FieldConfig`] that drives query generation, with the
//! `strict` setting already applied.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, Discovery, discover_configs, global_config_path, is_global_config};
pub use error::ConfigError;
use fql_query::FieldConfig;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{RawConfig, RawSettings, parse_config_file, parse_config_json, parse_config_str};
pub use templates::{global_template, local_template, write_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default for [`Settings::max_query_length`], in bytes.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 4096;

/// Top-level merged configuration for fql.
///
/// This represents the fully resolved configuration after merging all discovered `.fql.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Field definitions, with `settings.strict` applied.
    pub fields: FieldConfig,
    /// The config file each field definition came from.
    pub origins: BTreeMap<String, PathBuf>,
    /// Config files that were merged, highest precedence first.
    pub sources: Vec<PathBuf>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// The `root = true` file that stopped discovery.
    pub root_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.fql.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Parses `.fql.toml` files from `cwd` upward, stopping at `root = true`
    /// 2. Appends `~/.fql.toml` unless a root file was reached
    /// 3. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let discovery = discover_configs(cwd)?;
        let mut config = merge_configs(&discovery.configs);
        config.root_file = discovery.root;
        Ok(config)
    }

    /// Loads configuration from a single explicit file, bypassing discovery.
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as TOML.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&[path.to_path_buf()])
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - Empty configuration (no fields defined)
    /// - Empty or repetitive field groups
    /// - Renames that a field group makes unreachable
    /// - Blank backend field names
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }
}

/// General settings for fql.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Reject filters that use fields with no definition.
    pub strict: bool,
    /// Longest filter expression accepted, in bytes.
    pub max_query_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict: false,
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}
