//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::{collections::BTreeSet, fmt};

use fql_query::FieldSpec;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No fields are defined.
    NoFieldsDefined,
    /// A field group is present but lists no backend fields.
    EmptyFieldGroup {
        /// Logical field name.
        field: String,
    },
    /// Both a rename and a group are set; the rename is never used.
    FieldIgnoredByGroup {
        /// Logical field name.
        field: String,
        /// The unused backend name.
        backend: String,
    },
    /// A backend field appears more than once in a group.
    DuplicateGroupPath {
        /// Logical field name.
        field: String,
        /// The repeated backend field.
        path: String,
    },
    /// A backend field name is empty or whitespace.
    BlankBackendName {
        /// Logical field name.
        field: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFieldsDefined => {
                write!(f, "no fields are defined in configuration")
            }
            Self::EmptyFieldGroup { field } => {
                write!(f, "field '{field}' has an empty field_group")
            }
            Self::FieldIgnoredByGroup { field, backend } => {
                write!(
                    f,
                    "field '{field}' sets both field = '{backend}' and field_group; the field_group is used"
                )
            }
            Self::DuplicateGroupPath { field, path } => {
                write!(f, "field '{field}' lists '{path}' more than once in field_group")
            }
            Self::BlankBackendName { field } => {
                write!(f, "field '{field}' maps to a blank backend field name")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
///
/// This checks for:
/// - Empty configuration (no fields defined)
/// - Field groups that are empty or repeat a path
/// - Renames shadowed by a field group
/// - Blank backend names
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    if config.fields.is_empty() {
        return vec![ConfigWarning::NoFieldsDefined];
    }

    config
        .fields
        .iter()
        .flat_map(|(name, spec)| validate_field(name, spec))
        .collect()
}

/// Validates a single field definition.
fn validate_field(name: &str, spec: &FieldSpec) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if let Some(backend) = &spec.field {
        if backend.trim().is_empty() {
            warnings.push(ConfigWarning::BlankBackendName { field: name.into() });
        }
        if spec.group().is_some() {
            warnings.push(ConfigWarning::FieldIgnoredByGroup {
                field: name.into(),
                backend: backend.clone(),
            });
        }
    }

    let Some(group) = &spec.field_group else {
        return warnings;
    };
    if group.is_empty() {
        warnings.push(ConfigWarning::EmptyFieldGroup { field: name.into() });
    }

    let mut seen = BTreeSet::new();
    let mut blank_reported = false;
    for path in group {
        if path.trim().is_empty() {
            if !blank_reported {
                warnings.push(ConfigWarning::BlankBackendName { field: name.into() });
                blank_reported = true;
            }
        } else if !seen.insert(path.as_str()) {
            warnings.push(ConfigWarning::DuplicateGroupPath {
                field: name.into(),
                path: path.clone(),
            });
        }
    }

    warnings
}
