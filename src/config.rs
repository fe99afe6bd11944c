//! Validation settings.
//!
//! Every section derives serde with `#[serde(default)]`, so embedding
//! applications can deserialize a partial YAML or JSON document and get
//! defaults for everything left out.

use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::base::constants::{DEFAULT_MAX_FIELD_NUMBER, DEFAULT_TAB_SIZE};

/// Top-level configuration for a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Roots searched, in order, when resolving imports.
    pub search_paths: Vec<PathBuf>,
    /// Columns a leading tab counts for.
    pub tab_size: usize,
    pub validation: ValidationConfig,
    pub naming: NamingConfig,
    pub attributes: AttributeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
            tab_size: DEFAULT_TAB_SIZE,
            validation: ValidationConfig::default(),
            naming: NamingConfig::default(),
            attributes: AttributeConfig::default(),
        }
    }
}

impl Config {
    /// Load from a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Load from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_search_paths(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }
}

/// Field numbering rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require every struct and interface to number its fields.
    pub enforce_field_numbering: bool,
    pub allow_negative_field_numbers: bool,
    pub max_field_number: i64,
    pub warn_on_number_gaps: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_field_numbering: false,
            allow_negative_field_numbers: false,
            max_field_number: DEFAULT_MAX_FIELD_NUMBER,
            warn_on_number_gaps: true,
        }
    }
}

/// Naming convention patterns. Only checked when
/// `enforce_naming_conventions` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub type_name_pattern: String,
    pub field_name_pattern: String,
    pub constant_name_pattern: String,
    pub enforce_naming_conventions: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            type_name_pattern: "^[A-Z][a-zA-Z0-9]*$".to_string(),
            field_name_pattern: "^[a-z][a-z0-9_]*$".to_string(),
            constant_name_pattern: "^[A-Z][A-Z0-9_]*$".to_string(),
            enforce_naming_conventions: false,
        }
    }
}

/// Compiled naming patterns.
#[derive(Debug, Clone)]
pub struct NamingRules {
    pub type_name: Regex,
    pub field_name: Regex,
    pub constant_name: Regex,
}

impl NamingRules {
    pub fn accepts_type_name(&self, name: &str) -> bool {
        matches_start(&self.type_name, name)
    }

    pub fn accepts_field_name(&self, name: &str) -> bool {
        matches_start(&self.field_name, name)
    }

    pub fn accepts_constant_name(&self, name: &str) -> bool {
        matches_start(&self.constant_name, name)
    }
}

/// A match must begin at the first character; patterns anchor the end
/// themselves with `$` when they need to.
fn matches_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|m| m.start() == 0)
}

impl NamingConfig {
    /// Compile the patterns, or `None` when conventions are not enforced.
    pub fn compile(&self) -> Result<Option<NamingRules>, regex::Error> {
        if !self.enforce_naming_conventions {
            return Ok(None);
        }
        Ok(Some(NamingRules {
            type_name: Regex::new(&self.type_name_pattern)?,
            field_name: Regex::new(&self.field_name_pattern)?,
            constant_name: Regex::new(&self.constant_name_pattern)?,
        }))
    }
}

/// Attribute schema selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    /// Schema names checked, in order.
    pub enabled_schemas: Vec<String>,
    /// Extra schema documents to load into the registry.
    pub custom_schemas: Vec<PathBuf>,
    pub warn_unknown_attributes: bool,
    /// Report unknown attributes as errors.
    pub strict_mode: bool,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            enabled_schemas: Vec::new(),
            custom_schemas: Vec::new(),
            warn_unknown_attributes: true,
            strict_mode: false,
        }
    }
}
