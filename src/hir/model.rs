//! File-level semantic model.
//!
//! These types are produced by the extractor, registered in the
//! [`SymbolTable`](super::SymbolTable), and read by every validator. They are
//! immutable once extraction finishes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::{CollectionKind, Position, PrimitiveType};
use crate::parser::{ParsedSource, SyntaxNode};

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// A decoded attribute value.
///
/// Source files only produce the scalar variants and one level of `Object`;
/// `List` and deeper nesting come from schema documents, which share this
/// type for their `enum` constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<AttributeValue>),
    Object(IndexMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Name of the value's type as used in schema messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "'{v}'"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Attribute name → value, in declaration order.
pub type AttributeMap = IndexMap<String, AttributeValue>;

// ============================================================================
// TYPE REFERENCES
// ============================================================================

/// One collection dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Fixed(i64),
    Max(i64),
    Dynamic,
}

/// `array<T, ...>`, `matrix<T, ...>` or `tensor<T, ...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionType {
    pub kind: CollectionKind,
    pub element: Box<TypeRef>,
    pub dims: Vec<Dimension>,
}

/// A field's type as written. Named references stay unresolved until the
/// symbol table is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(PrimitiveType),
    /// Bare identifier or `::`-qualified path.
    Named(Arc<str>),
    Collection(CollectionType),
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Named(name) => f.write_str(name),
            Self::Collection(c) => {
                write!(f, "{}<{}", c.kind, c.element)?;
                for dim in &c.dims {
                    match dim {
                        Dimension::Fixed(n) => write!(f, ", {n}")?,
                        Dimension::Max(n) => write!(f, ", max={n}")?,
                        Dimension::Dynamic => f.write_str(", ?")?,
                    }
                }
                f.write_str(">")
            }
        }
    }
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// A struct or interface field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Arc<str>,
    pub ty: TypeRef,
    pub number: Option<i64>,
    pub optional: bool,
    pub inline_attributes: AttributeMap,
    pub attributes: AttributeMap,
    pub position: Position,
}

impl Field {
    /// Inline attributes overlaid with the indented block.
    pub fn all_attributes(&self) -> AttributeMap {
        let mut merged = self.inline_attributes.clone();
        for (key, value) in &self.attributes {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// An enum member with its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: Arc<str>,
    pub value: i128,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumBody {
    /// Declared storage type name, `int32` when omitted.
    pub storage_type: Arc<str>,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Struct,
    Interface,
    Enum,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeBody {
    Struct(Vec<Field>),
    Interface(Vec<Field>),
    Enum(EnumBody),
}

/// A struct, interface, or enum definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: Arc<str>,
    pub qualified_name: Arc<str>,
    pub file: PathBuf,
    pub position: Position,
    pub attributes: AttributeMap,
    pub body: TypeBody,
}

impl TypeDefinition {
    pub fn kind(&self) -> TypeKind {
        match self.body {
            TypeBody::Struct(_) => TypeKind::Struct,
            TypeBody::Interface(_) => TypeKind::Interface,
            TypeBody::Enum(_) => TypeKind::Enum,
        }
    }

    /// Fields of a struct or interface; empty for enums.
    pub fn fields(&self) -> &[Field] {
        match &self.body {
            TypeBody::Struct(fields) | TypeBody::Interface(fields) => fields,
            TypeBody::Enum(_) => &[],
        }
    }

    pub fn enum_body(&self) -> Option<&EnumBody> {
        match &self.body {
            TypeBody::Enum(body) => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDefinition {
    pub name: Arc<str>,
    pub qualified_name: Arc<str>,
    pub file: PathBuf,
    pub ty: PrimitiveType,
    pub value: AttributeValue,
    pub position: Position,
}

/// `using Alias = primitive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDefinition {
    pub name: Arc<str>,
    pub qualified_name: Arc<str>,
    pub file: PathBuf,
    pub target: PrimitiveType,
    pub position: Position,
}

// ============================================================================
// FILES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Segments joined with `/`, without extension.
    pub path: String,
    pub position: Position,
}

/// Everything extracted from one `.msg` file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub namespace: Arc<str>,
    pub imports: Vec<Import>,
    pub using_namespaces: Vec<Arc<str>>,
    /// Alias → target namespace, in declaration order.
    pub namespace_aliases: IndexMap<Arc<str>, Arc<str>>,
    pub types: Vec<Arc<TypeDefinition>>,
    pub constants: Vec<Arc<ConstantDefinition>>,
    pub aliases: Vec<Arc<AliasDefinition>>,
    pub tree: ParsedSource,
}

impl SourceFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root of the raw syntax tree.
    pub fn syntax(&self) -> SyntaxNode {
        self.tree.syntax()
    }

    /// Qualify a simple name with this file's namespace.
    pub fn qualify(&self, name: &str) -> Arc<str> {
        qualify(&self.namespace, name)
    }
}

/// `namespace::name`, or just `name` in the root namespace.
pub fn qualify(namespace: &str, name: &str) -> Arc<str> {
    if namespace.is_empty() {
        Arc::from(name)
    } else {
        Arc::from(format!("{namespace}::{name}"))
    }
}
