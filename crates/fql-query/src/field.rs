//! Field configuration: how logical filter fields map onto backend fields.
//!
//! A [`FieldConfig`] deserializes from the wire shape
//! `{ "<name>": { "type": "string|number|date", "field": "...", "field_group": [...] } }`.

use std::{
    collections::{BTreeMap, btree_map},
    fmt,
};

use serde::{Deserialize, Serialize};

/// Value type of a field, which decides how range comparisons are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Compared lexicographically.
    #[default]
    String,
    /// Compared as floating-point numbers.
    Number,
    /// Compared as ISO-8601 dates.
    Date,
}

impl FieldKind {
    /// The kind's name as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one logical field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Value type. Defaults to string.
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    /// Backend field name, if different from the logical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Backend fields searched together; equality becomes a disjunction over them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_group: Option<Vec<String>>,
}

impl FieldSpec {
    /// Creates a spec of the given kind with no rename and no group.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            field: None,
            field_group: None,
        }
    }

    /// A string field.
    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// A number field.
    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    /// A date field.
    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    /// Maps the logical field to a differently named backend field.
    pub fn with_field(mut self, backend: impl Into<String>) -> Self {
        self.field = Some(backend.into());
        self
    }

    /// Expands the logical field to several backend fields.
    pub fn with_group<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_group = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Backend field name for `logical`, falling back to the logical name.
    pub fn backend_field<'a>(&'a self, logical: &'a str) -> &'a str {
        self.field.as_deref().unwrap_or(logical)
    }

    /// The field group, if one is configured and non-empty.
    pub fn group(&self) -> Option<&[String]> {
        self.field_group.as_deref().filter(|paths| !paths.is_empty())
    }
}

/// Mapping from logical field name to its configuration.
///
/// Passed by reference into every generation call; never shared mutably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, FieldSpec>",
    into = "BTreeMap<String, FieldSpec>"
)]
pub struct FieldConfig {
    /// Field entries keyed by logical name.
    fields: BTreeMap<String, FieldSpec>,
    /// Reject fields that have no entry.
    strict: bool,
}

impl FieldConfig {
    /// Creates an empty, permissive configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, returning the updated configuration.
    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Sets whether unconfigured fields are rejected.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Inserts a field, returning the previous spec for that name.
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) -> Option<FieldSpec> {
        self.fields.insert(name.into(), spec)
    }

    /// Looks up a field by logical name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Whether unconfigured fields are rejected.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Number of configured fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are configured.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldSpec> {
        self.fields.iter()
    }
}

impl From<BTreeMap<String, FieldSpec>> for FieldConfig {
    fn from(fields: BTreeMap<String, FieldSpec>) -> Self {
        Self {
            fields,
            strict: false,
        }
    }
}

impl From<FieldConfig> for BTreeMap<String, FieldSpec> {
    fn from(config: FieldConfig) -> Self {
        config.fields
    }
}

impl FromIterator<(String, FieldSpec)> for FieldConfig {
    fn from_iter<T: IntoIterator<Item = (String, FieldSpec)>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

impl<'a> IntoIterator for &'a FieldConfig {
    type Item = (&'a String, &'a FieldSpec);
    type IntoIter = btree_map::Iter<'a, String, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
