//! AST extraction — typed syntax tree to semantic model.
//!
//! Walks the [`ast`] wrappers of one parsed file and builds a [`SourceFile`].
//! Extraction is best effort: a construct that cannot be decoded is left out
//! and reported as a `malformed_construct` warning, and the walk continues.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::diagnostics::{Diagnostic, ErrorKind};
use super::imports::normalize_path;
use super::model::{
    AliasDefinition, AttributeMap, AttributeValue, CollectionType, ConstantDefinition, Dimension,
    EnumBody, EnumMember, Field, Import, SourceFile, TypeBody, TypeDefinition, TypeRef,
};
use crate::base::{parse_integer_saturating, saturate_i64, Position};
use crate::base::constants::{DEFAULT_ENUM_STORAGE, MSG_EXTENSION};
use crate::parser::ast::{self, AstNode, DimensionValue, Item};
use crate::parser::{ParsedSource, SyntaxKind, SyntaxNode};

/// Inputs the extractor needs beyond the tree itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions<'a> {
    /// Import roots, used to derive the file's namespace.
    pub search_paths: &'a [PathBuf],
}

/// The model of one file plus the non-fatal findings met on the way.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub file: SourceFile,
    pub findings: Vec<Diagnostic>,
}

/// Build the semantic model of one parsed file.
pub fn extract_file(path: &Path, parsed: &ParsedSource, options: &ExtractOptions<'_>) -> Extracted {
    let namespace: Arc<str> = Arc::from(derive_namespace(path, options.search_paths));
    debug!(file = %path.display(), namespace = %namespace, "extracting");

    let mut extractor = Extractor {
        path,
        parsed,
        findings: Vec::new(),
        file: SourceFile {
            path: path.to_path_buf(),
            namespace,
            imports: Vec::new(),
            using_namespaces: Vec::new(),
            namespace_aliases: IndexMap::new(),
            types: Vec::new(),
            constants: Vec::new(),
            aliases: Vec::new(),
            tree: parsed.clone(),
        },
    };

    if let Some(root) = ast::SourceFile::cast(parsed.syntax()) {
        for item in root.items() {
            extractor.item(item);
        }
    }

    Extracted {
        file: extractor.file,
        findings: extractor.findings,
    }
}

/// Namespace of a file: its path without extension, relative to the first
/// search root containing it, with `::` separators.
///
/// A relative path outside every root keeps its own components; an absolute
/// one falls back to the file stem.
pub fn derive_namespace(path: &Path, search_paths: &[PathBuf]) -> String {
    let normalized = normalize_path(path);
    for root in search_paths {
        if let Ok(relative) = normalized.strip_prefix(normalize_path(root)) {
            let namespace = join_components(relative);
            if !namespace.is_empty() {
                return namespace;
            }
        }
    }

    if path.is_absolute() {
        return file_stem(path);
    }
    join_components(path)
}

fn join_components(path: &Path) -> String {
    let without_ext = if path.extension().is_some_and(|e| e == MSG_EXTENSION) {
        path.with_extension("")
    } else {
        path.to_path_buf()
    };
    without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("::")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

struct Extractor<'a> {
    path: &'a Path,
    parsed: &'a ParsedSource,
    file: SourceFile,
    findings: Vec<Diagnostic>,
}

impl Extractor<'_> {
    fn position(&self, node: &SyntaxNode) -> Position {
        self.parsed.node_position(node)
    }

    fn malformed(&mut self, node: &SyntaxNode, message: impl Into<String>) {
        let position = self.position(node);
        self.findings.push(Diagnostic::warning(
            self.path,
            position,
            ErrorKind::MalformedConstruct,
            message.into(),
        ));
    }

    fn item(&mut self, item: Item) {
        match item {
            Item::Import(import) => self.import(&import),
            Item::UsingNamespace(using) => match using.target() {
                Some(target) => self.file.using_namespaces.push(Arc::from(target.text())),
                None => self.malformed(using.syntax(), "using namespace without a target"),
            },
            Item::NamespaceAlias(alias) => {
                match (alias.name().and_then(|n| n.text()), alias.target()) {
                    (Some(name), Some(target)) => {
                        self.file
                            .namespace_aliases
                            .insert(Arc::from(name), Arc::from(target.text()));
                    }
                    _ => self.malformed(alias.syntax(), "incomplete namespace alias"),
                }
            }
            Item::UsingAlias(alias) => self.alias(&alias),
            Item::Const(constant) => self.constant(&constant),
            Item::Struct(def) => {
                let body = def.body();
                self.record(def.syntax(), def.name(), body, TypeBody::Struct)
            }
            Item::Interface(def) => {
                let body = def.body();
                self.record(def.syntax(), def.name(), body, TypeBody::Interface)
            }
            Item::Enum(def) => self.enumeration(&def),
        }
    }

    fn import(&mut self, import: &ast::Import) {
        let Some(path) = import.path() else {
            self.malformed(import.syntax(), "import without a path");
            return;
        };
        let segments = path.segments();
        if segments.iter().any(String::is_empty) {
            self.malformed(
                import.syntax(),
                format!("import path '{}' has an empty segment", path.text()),
            );
            return;
        }
        let position = self.position(import.syntax());
        self.file.imports.push(Import {
            path: segments.join("/"),
            position,
        });
    }

    fn alias(&mut self, alias: &ast::UsingAlias) {
        let name = alias.name().and_then(|n| n.text());
        let target = alias.target().and_then(|t| t.primitive());
        let (Some(name), Some(target)) = (name, target) else {
            self.malformed(alias.syntax(), "incomplete type alias");
            return;
        };
        self.file.aliases.push(Arc::new(AliasDefinition {
            qualified_name: self.file.qualify(&name),
            name: Arc::from(name),
            file: self.path.to_path_buf(),
            target,
            position: self.position(alias.syntax()),
        }));
    }

    fn constant(&mut self, constant: &ast::ConstDef) {
        let name = constant.name().and_then(|n| n.text());
        let ty = constant.ty().and_then(|t| t.primitive());
        let (Some(name), Some(ty)) = (name, ty) else {
            self.malformed(constant.syntax(), "incomplete constant definition");
            return;
        };
        let Some(literal) = constant.value() else {
            self.malformed(constant.syntax(), format!("constant '{name}' has no value"));
            return;
        };
        let Some(value) = self.literal(&literal) else {
            return;
        };
        self.file.constants.push(Arc::new(ConstantDefinition {
            qualified_name: self.file.qualify(&name),
            name: Arc::from(name),
            file: self.path.to_path_buf(),
            ty,
            value,
            position: self.position(constant.syntax()),
        }));
    }

    fn record(
        &mut self,
        node: &SyntaxNode,
        name: Option<ast::Name>,
        body: Option<ast::DefBody>,
        make: fn(Vec<Field>) -> TypeBody,
    ) {
        let Some(name) = name.and_then(|n| n.text()) else {
            self.malformed(node, "type definition without a name");
            return;
        };
        let mut fields = Vec::new();
        let mut attributes = AttributeMap::new();
        if let Some(body) = body {
            attributes = self.type_attributes(&body);
            for field in body.fields() {
                if let Some(field) = self.field(&field) {
                    fields.push(field);
                }
            }
        }
        self.push_type(node, name, attributes, make(fields));
    }

    fn enumeration(&mut self, def: &ast::EnumDef) {
        let Some(name) = def.name().and_then(|n| n.text()) else {
            self.malformed(def.syntax(), "enum without a name");
            return;
        };
        let storage_type = def
            .storage_type()
            .and_then(|s| s.text())
            .unwrap_or_else(|| DEFAULT_ENUM_STORAGE.to_string());

        let mut members = Vec::new();
        let mut attributes = AttributeMap::new();
        if let Some(body) = def.body() {
            attributes = self.type_attributes(&body);
            let mut counter: i128 = 0;
            for member in body.members() {
                let Some(member_name) = member.name().and_then(|n| n.text()) else {
                    self.malformed(member.syntax(), "enum member without a name");
                    continue;
                };
                let value = match member.value_text() {
                    Some(text) => match parse_integer_saturating(&text) {
                        Some(value) => value,
                        None => {
                            self.malformed(
                                member.syntax(),
                                format!("enum member '{member_name}' has an invalid value '{text}'"),
                            );
                            continue;
                        }
                    },
                    None => counter,
                };
                counter = value.saturating_add(1);
                members.push(EnumMember {
                    name: Arc::from(member_name),
                    value,
                    position: self.position(member.syntax()),
                });
            }
        }

        let body = TypeBody::Enum(EnumBody {
            storage_type: Arc::from(storage_type),
            members,
        });
        self.push_type(def.syntax(), name, attributes, body);
    }

    fn push_type(&mut self, node: &SyntaxNode, name: String, attributes: AttributeMap, body: TypeBody) {
        let definition = TypeDefinition {
            qualified_name: self.file.qualify(&name),
            name: Arc::from(name),
            file: self.path.to_path_buf(),
            position: self.position(node),
            attributes,
            body,
        };
        self.file.types.push(Arc::new(definition));
    }

    fn type_attributes(&mut self, body: &ast::DefBody) -> AttributeMap {
        body.attribute_block()
            .and_then(|block| block.list())
            .map(|list| self.attribute_list(&list))
            .unwrap_or_default()
    }

    fn field(&mut self, field: &ast::Field) -> Option<Field> {
        let Some(name) = field.name().and_then(|n| n.text()) else {
            self.malformed(field.syntax(), "field without a name");
            return None;
        };
        let Some(ty) = field.ty().and_then(|ty| self.type_ref(&ty)) else {
            self.malformed(field.syntax(), format!("field '{name}' has no usable type"));
            return None;
        };
        let number = match field.number() {
            Some(number) => {
                // Oversized literals saturate so range checks still see them.
                let parsed = number
                    .value_text()
                    .and_then(|t| parse_integer_saturating(&t))
                    .map(saturate_i64);
                if parsed.is_none() {
                    self.malformed(
                        field.syntax(),
                        format!("field '{name}' has an invalid field number"),
                    );
                    return None;
                }
                parsed
            }
            None => None,
        };

        let mut inline_attributes = AttributeMap::new();
        for attribute in field.inline_attributes() {
            let Some(attr_name) = attribute.name().and_then(|n| n.text()) else {
                self.malformed(attribute.syntax(), "inline attribute without a name");
                continue;
            };
            if let Some(value) = attribute.value().and_then(|lit| self.literal(&lit)) {
                inline_attributes.insert(attr_name, value);
            }
        }

        let attributes = field
            .attribute_list()
            .map(|list| self.attribute_list(&list))
            .unwrap_or_default();

        Some(Field {
            name: Arc::from(name),
            ty,
            number,
            optional: field.is_optional(),
            inline_attributes,
            attributes,
            position: self.position(field.syntax()),
        })
    }

    fn type_ref(&mut self, ty: &ast::TypeExpr) -> Option<TypeRef> {
        match ty {
            ast::TypeExpr::Primitive(p) => p.primitive().map(TypeRef::Primitive),
            ast::TypeExpr::Named(named) => named
                .qualified_name()
                .map(|q| TypeRef::Named(Arc::from(q.text()))),
            ast::TypeExpr::Collection(collection) => {
                let kind = collection.kind()?;
                let element = self.type_ref(&collection.element()?)?;
                let mut dims = Vec::new();
                for dim in collection.dimensions() {
                    match dim.value() {
                        Some(DimensionValue::Fixed(n)) => dims.push(Dimension::Fixed(n)),
                        Some(DimensionValue::Max(n)) => dims.push(Dimension::Max(n)),
                        Some(DimensionValue::Dynamic) => dims.push(Dimension::Dynamic),
                        None => {
                            self.malformed(dim.syntax(), format!("invalid {kind} dimension"));
                            return None;
                        }
                    }
                }
                Some(TypeRef::Collection(CollectionType {
                    kind,
                    element: Box::new(element),
                    dims,
                }))
            }
        }
    }

    fn attribute_list(&mut self, list: &ast::AttributeList) -> AttributeMap {
        let mut map = AttributeMap::new();
        for entry in list.entries() {
            let Some(name) = entry.name().and_then(|n| n.text()) else {
                self.malformed(entry.syntax(), "attribute without a name");
                continue;
            };
            if let Some(nested) = entry.nested() {
                let mut object = IndexMap::new();
                self.flatten_into(&nested, &mut object);
                map.insert(name, AttributeValue::Object(object));
            } else if let Some(literal) = entry.value() {
                if let Some(value) = self.literal(&literal) {
                    map.insert(name, value);
                }
            } else {
                self.malformed(entry.syntax(), format!("attribute '{name}' has no value"));
            }
        }
        map
    }

    /// Collect every simple entry below `list`, at any depth, into `out`.
    fn flatten_into(&mut self, list: &ast::AttributeList, out: &mut IndexMap<String, AttributeValue>) {
        for entry in list.entries() {
            if let Some(nested) = entry.nested() {
                self.flatten_into(&nested, out);
                continue;
            }
            let name = entry.name().and_then(|n| n.text());
            let value = entry.value().and_then(|lit| self.literal(&lit));
            if let (Some(name), Some(value)) = (name, value) {
                out.insert(name, value);
            }
        }
    }

    fn literal(&mut self, literal: &ast::Literal) -> Option<AttributeValue> {
        let Some(token) = literal.token() else {
            self.malformed(literal.syntax(), "missing literal");
            return None;
        };
        let text = token.text();
        let value = match token.kind() {
            SyntaxKind::TRUE_KW => Some(AttributeValue::Bool(true)),
            SyntaxKind::FALSE_KW => Some(AttributeValue::Bool(false)),
            SyntaxKind::INTEGER => text.parse().ok().map(AttributeValue::Integer),
            SyntaxKind::FLOAT => text.parse().ok().map(AttributeValue::Float),
            SyntaxKind::STRING | SyntaxKind::TRIPLE_STRING => {
                Some(AttributeValue::String(unquote(text).to_string()))
            }
            _ => None,
        };
        if value.is_none() {
            self.malformed(literal.syntax(), format!("cannot decode literal '{text}'"));
        }
        value
    }
}

/// Strip `"""`, `"` or `'` delimiters.
fn unquote(text: &str) -> &str {
    for quote in ["\"\"\"", "\"", "'"] {
        if text.len() >= 2 * quote.len() && text.starts_with(quote) && text.ends_with(quote) {
            return &text[quote.len()..text.len() - quote.len()];
        }
    }
    text
}
