use super::*;

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    children_method!(items, Item);
    descendants_method!(
        collection_types,
        CollectionTypeExpr,
        "Every collection type expression in the file, nested ones included."
    );
}

// ============================================================================
// Top-level items
// ============================================================================

/// Any top-level statement of a `.msg` file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Import(Import),
    UsingNamespace(UsingNamespace),
    NamespaceAlias(NamespaceAlias),
    UsingAlias(UsingAlias),
    Const(ConstDef),
    Struct(StructDef),
    Interface(InterfaceDef),
    Enum(EnumDef),
}

impl AstNode for Item {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::IMPORT
                | SyntaxKind::USING_NAMESPACE
                | SyntaxKind::NAMESPACE_ALIAS
                | SyntaxKind::USING_ALIAS
                | SyntaxKind::CONST_DEF
                | SyntaxKind::STRUCT_DEF
                | SyntaxKind::INTERFACE_DEF
                | SyntaxKind::ENUM_DEF
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::IMPORT => Some(Self::Import(Import(node))),
            SyntaxKind::USING_NAMESPACE => Some(Self::UsingNamespace(UsingNamespace(node))),
            SyntaxKind::NAMESPACE_ALIAS => Some(Self::NamespaceAlias(NamespaceAlias(node))),
            SyntaxKind::USING_ALIAS => Some(Self::UsingAlias(UsingAlias(node))),
            SyntaxKind::CONST_DEF => Some(Self::Const(ConstDef(node))),
            SyntaxKind::STRUCT_DEF => Some(Self::Struct(StructDef(node))),
            SyntaxKind::INTERFACE_DEF => Some(Self::Interface(InterfaceDef(node))),
            SyntaxKind::ENUM_DEF => Some(Self::Enum(EnumDef(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Import(n) => n.syntax(),
            Self::UsingNamespace(n) => n.syntax(),
            Self::NamespaceAlias(n) => n.syntax(),
            Self::UsingAlias(n) => n.syntax(),
            Self::Const(n) => n.syntax(),
            Self::Struct(n) => n.syntax(),
            Self::Interface(n) => n.syntax(),
            Self::Enum(n) => n.syntax(),
        }
    }
}

// ============================================================================
// Imports and namespace directives
// ============================================================================

ast_node!(Import, IMPORT);

impl Import {
    first_child_method!(path, ImportPath);
}

ast_node!(ImportPath, IMPORT_PATH);

impl ImportPath {
    /// Segments between `/` separators. Empty segments are kept so callers
    /// can detect malformed paths.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = vec![String::new()];
        for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                SyntaxKind::SLASH => segments.push(String::new()),
                kind if kind.is_trivia() => {}
                _ => {
                    if let Some(last) = segments.last_mut() {
                        last.push_str(token.text());
                    }
                }
            }
        }
        segments
    }

    /// The path with segments joined by `/`.
    pub fn text(&self) -> String {
        self.segments().join("/")
    }
}

ast_node!(UsingNamespace, USING_NAMESPACE);

impl UsingNamespace {
    first_child_method!(target, QualifiedName);
}

ast_node!(NamespaceAlias, NAMESPACE_ALIAS);

impl NamespaceAlias {
    first_child_method!(name, Name);
    first_child_method!(target, QualifiedName);
}

ast_node!(UsingAlias, USING_ALIAS);

impl UsingAlias {
    first_child_method!(name, Name);
    first_child_method!(target, PrimitiveTypeExpr);
}

ast_node!(ConstDef, CONST_DEF);

impl ConstDef {
    first_child_method!(ty, PrimitiveTypeExpr);
    first_child_method!(name, Name);
    first_child_method!(value, Literal);
}

// ============================================================================
// Definitions
// ============================================================================

ast_node!(StructDef, STRUCT_DEF);

impl StructDef {
    first_child_method!(name, Name);
    first_child_method!(body, DefBody);
}

ast_node!(InterfaceDef, INTERFACE_DEF);

impl InterfaceDef {
    first_child_method!(name, Name);
    first_child_method!(body, DefBody);
}

ast_node!(EnumDef, ENUM_DEF);

impl EnumDef {
    first_child_method!(name, Name);
    first_child_method!(storage_type, StorageType);
    first_child_method!(body, DefBody);
}

ast_node!(StorageType, STORAGE_TYPE);

impl StorageType {
    /// The declared storage type name, e.g. `uint8`.
    pub fn text(&self) -> Option<String> {
        find_name_token(&self.0).map(|t| t.text().to_string())
    }
}

ast_node!(DefBody, DEF_BODY);

impl DefBody {
    first_child_method!(attribute_block, AttributeBlock);
    children_method!(fields, Field);
    children_method!(members, EnumMember);
}

ast_node!(EnumMember, ENUM_MEMBER);

impl EnumMember {
    first_child_method!(name, Name);
    has_token_method!(has_explicit_value, EQ, "READY = 3");

    /// Text of the explicit value, if any.
    pub fn value_text(&self) -> Option<String> {
        find_token(&self.0, SyntaxKind::INTEGER).map(|t| t.text().to_string())
    }
}
