//! Configuration file parsing.
//!
//! Parses individual `.fql.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging. Files with a
//! `.json` extension are read as JSON with the same schema.

use std::{collections::BTreeMap, fs, path::Path};

use fql_query::FieldSpec;
use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a config file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Field definitions: logical name -> field spec.
    pub fields: Option<BTreeMap<String, FieldSpec>>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Reject filters that use unconfigured fields.
    pub strict: Option<bool>,
    /// Longest filter expression accepted, in bytes.
    pub max_query_length: Option<usize>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    if is_json(path) {
        parse_config_json(&contents, path)
    } else {
        parse_config_str(&contents, path)
    }
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a JSON string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_json(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::ParseJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns true if the path has a `.json` extension.
fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
