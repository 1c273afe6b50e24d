//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    path::PathBuf,
};

use fql_query::{FieldConfig, FieldSpec};
use tracing::debug;

use crate::{
    Config, Settings,
    parse::{RawConfig, RawSettings},
};

/// A parsed config file with its source path.
#[derive(Debug)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Fields: merged by name, first definition wins completely (type, field, field_group)
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let settings = merge_settings(configs);
    let (fields, origins) = merge_fields(configs);
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    debug!(
        files = configs.len(),
        fields = fields.len(),
        strict = settings.strict,
        "merged configuration"
    );

    Config {
        fields: FieldConfig::from(fields).with_strict(settings.strict),
        settings,
        origins,
        sources: configs.iter().map(|c| c.path.clone()).collect(),
        config_root,
        root_file: None,
    }
}

/// Merges general settings, taking first defined value for each field.
fn merge_settings(configs: &[ParsedConfig]) -> Settings {
    let mut result = Settings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref settings) = parsed.config.settings {
            apply_raw_settings(&mut result, settings);
        }
    }

    result
}

/// Applies raw settings to result, overwriting any present values.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(v) = raw.strict {
        result.strict = v;
    }
    if let Some(v) = raw.max_query_length {
        result.max_query_length = v;
    }
}

/// Merged field specs with the file each one came from.
type MergedFields = (BTreeMap<String, FieldSpec>, BTreeMap<String, PathBuf>);

/// Merges fields from all configs by name - first definition wins completely.
fn merge_fields(configs: &[ParsedConfig]) -> MergedFields {
    let mut fields = BTreeMap::new();
    let mut origins = BTreeMap::new();

    // Iterate in precedence order (highest first) - first definition wins
    for parsed in configs {
        let Some(ref raw_fields) = parsed.config.fields else {
            continue;
        };
        for (name, spec) in raw_fields {
            match fields.entry(name.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(spec.clone());
                    origins.insert(name.clone(), parsed.path.clone());
                }
                Entry::Occupied(_) => {
                    debug!(field = %name, path = %parsed.path.display(), "field shadowed by closer config");
                }
            }
        }
    }

    (fields, origins)
}
