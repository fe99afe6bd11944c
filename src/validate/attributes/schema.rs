//! Attribute schema documents.
//!
//! A schema declares, per attribute name, the accepted value type(s) plus
//! optional constraints. Documents are YAML or JSON:
//!
//! ```yaml
//! schema_name: units
//! field_attributes:
//!   unit:
//!     type: string
//!     constraints:
//!       enum: [m, s, kg]
//!   range:
//!     type: object
//!     properties:
//!       min: { type: number, required: true }
//!       max: { type: number, required: true }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::hir::AttributeValue;

/// Failure to load a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema file extension: {0}")]
    UnsupportedExtension(PathBuf),
}

/// Which attribute table of a schema applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeScope {
    Field,
    Struct,
    Enum,
}

/// One named set of attribute declarations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttributeSchema {
    pub schema_name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub field_attributes: IndexMap<String, AttributeSpec>,
    #[serde(default)]
    pub struct_attributes: IndexMap<String, AttributeSpec>,
    #[serde(default)]
    pub enum_attributes: IndexMap<String, AttributeSpec>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl AttributeSchema {
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a `.yaml`, `.yml`, or `.json` document.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(SchemaError::UnsupportedExtension(path.to_path_buf())),
        }
    }

    pub fn attributes(&self, scope: AttributeScope) -> &IndexMap<String, AttributeSpec> {
        match scope {
            AttributeScope::Field => &self.field_attributes,
            AttributeScope::Struct => &self.struct_attributes,
            AttributeScope::Enum => &self.enum_attributes,
        }
    }

    /// The declaration of `name` in `scope`, if this schema knows it.
    pub fn spec(&self, scope: AttributeScope, name: &str) -> Option<&AttributeSpec> {
        self.attributes(scope).get(name)
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Value types a declaration can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Integer,
    /// Integers are accepted too.
    Float,
    Number,
    Boolean,
    Object,
    Array,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Object => "object",
            ValueType::Array => "array",
        }
    }

    pub fn accepts(self, value: &AttributeValue) -> bool {
        matches!(
            (self, value),
            (ValueType::String, AttributeValue::String(_))
                | (ValueType::Integer, AttributeValue::Integer(_))
                | (
                    ValueType::Float | ValueType::Number,
                    AttributeValue::Integer(_) | AttributeValue::Float(_)
                )
                | (ValueType::Boolean, AttributeValue::Bool(_))
                | (ValueType::Object, AttributeValue::Object(_))
                | (ValueType::Array, AttributeValue::List(_))
        )
    }
}

/// A single type or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    One(ValueType),
    AnyOf(Vec<ValueType>),
}

impl TypeSpec {
    pub fn accepts(&self, value: &AttributeValue) -> bool {
        match self {
            TypeSpec::One(ty) => ty.accepts(value),
            TypeSpec::AnyOf(types) => types.iter().any(|ty| ty.accepts(value)),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::One(ty) => f.write_str(ty.as_str()),
            TypeSpec::AnyOf(types) => {
                let names: Vec<_> = types.iter().map(|t| t.as_str()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

/// A numeric bound, kept as written.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Integer(i64),
    Float(f64),
}

impl Bound {
    fn as_f64(self) -> f64 {
        match self {
            Bound::Integer(v) => v as f64,
            Bound::Float(v) => v,
        }
    }

    /// `value < self`, exact for integers.
    fn is_above(self, value: &AttributeValue) -> bool {
        match (self, value) {
            (Bound::Integer(bound), AttributeValue::Integer(v)) => *v < bound,
            _ => value.as_f64().is_some_and(|v| v < self.as_f64()),
        }
    }

    /// `value > self`, exact for integers.
    fn is_below(self, value: &AttributeValue) -> bool {
        match (self, value) {
            (Bound::Integer(bound), AttributeValue::Integer(v)) => *v > bound,
            _ => value.as_f64().is_some_and(|v| v > self.as_f64()),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Integer(v) => write!(f, "{v}"),
            Bound::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A regex compiled when the schema is loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match anchored at the start of `text`, not necessarily at its end.
    pub fn matches_start(&self, text: &str) -> bool {
        self.regex.find(text).is_some_and(|m| m.start() == 0)
    }
}

impl TryFrom<String> for Pattern {
    type Error = regex::Error;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        let regex = Regex::new(&source)?;
        Ok(Self { source, regex })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    #[serde(rename = "enum")]
    pub allowed: Option<Vec<AttributeValue>>,
}

/// Declaration of one attribute (or of one object property / array item).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttributeSpec {
    #[serde(rename = "type")]
    pub ty: Option<TypeSpec>,
    pub constraints: Constraints,
    pub properties: IndexMap<String, AttributeSpec>,
    pub items: Option<Box<AttributeSpec>>,
    /// Only meaningful for object properties.
    pub required: bool,
    pub description: Option<String>,
}

impl AttributeSpec {
    /// Check `value` against this declaration. The first failure wins.
    pub fn validate(&self, value: &AttributeValue) -> Result<(), String> {
        let Some(ty) = &self.ty else {
            return Err("Schema error: no type specified".to_string());
        };
        if !ty.accepts(value) {
            return Err(format!("Expected type {ty}, got {}", value.type_name()));
        }

        self.check_constraints(value)?;

        match value {
            AttributeValue::Object(object) => self.validate_properties(object),
            AttributeValue::List(items) => self.validate_items(items),
            _ => Ok(()),
        }
    }

    fn check_constraints(&self, value: &AttributeValue) -> Result<(), String> {
        let c = &self.constraints;

        if matches!(value, AttributeValue::Integer(_) | AttributeValue::Float(_)) {
            if let Some(min) = c.min.filter(|min| min.is_above(value)) {
                return Err(format!("Value {value} is less than minimum {min}"));
            }
            if let Some(max) = c.max.filter(|max| max.is_below(value)) {
                return Err(format!("Value {value} exceeds maximum {max}"));
            }
        }

        let length = match value {
            AttributeValue::String(s) => Some(s.chars().count()),
            AttributeValue::List(items) => Some(items.len()),
            _ => None,
        };
        if let Some(len) = length {
            if let Some(min) = c.min_length.filter(|min| len < *min) {
                return Err(format!("Length {len} is less than minimum {min}"));
            }
            if let Some(max) = c.max_length.filter(|max| len > *max) {
                return Err(format!("Length {len} exceeds maximum {max}"));
            }
        }

        if let (AttributeValue::String(s), Some(pattern)) = (value, &c.pattern) {
            if !pattern.matches_start(s) {
                return Err(format!(
                    "Value '{s}' does not match pattern '{}'",
                    pattern.as_str()
                ));
            }
        }

        if let Some(allowed) = &c.allowed {
            if !allowed.contains(value) {
                let list = AttributeValue::List(allowed.clone());
                return Err(format!("Value {value} not in allowed values: {list}"));
            }
        }

        Ok(())
    }

    fn validate_properties(&self, object: &IndexMap<String, AttributeValue>) -> Result<(), String> {
        for (name, spec) in &self.properties {
            if spec.required && !object.contains_key(name) {
                return Err(format!("Required property '{name}' missing"));
            }
        }
        for (name, value) in object {
            // Undeclared properties are allowed.
            let Some(spec) = self.properties.get(name) else {
                continue;
            };
            spec.validate(value)
                .map_err(|reason| format!("Property '{name}': {reason}"))?;
        }
        Ok(())
    }

    fn validate_items(&self, items: &[AttributeValue]) -> Result<(), String> {
        let Some(spec) = &self.items else {
            return Ok(());
        };
        for (i, item) in items.iter().enumerate() {
            spec.validate(item)
                .map_err(|reason| format!("Array item {i}: {reason}"))?;
        }
        Ok(())
    }
}
