use std::num::IntErrorKind;

use super::*;
use crate::base::{parse_integer_saturating, saturate_i64, CollectionKind, PrimitiveType};

// ============================================================================
// Fields
// ============================================================================

ast_node!(Field, FIELD);

impl Field {
    has_token_method!(is_optional, OPTIONAL_KW, "optional string nickname");
    first_child_method!(ty, TypeExpr);
    first_child_method!(name, Name);
    first_child_method!(number, FieldNumber);
    children_method!(inline_attributes, InlineAttribute);
    first_child_method!(attribute_list, AttributeList);
}

ast_node!(FieldNumber, FIELD_NUMBER);

impl FieldNumber {
    pub fn value_text(&self) -> Option<String> {
        find_token(&self.0, SyntaxKind::INTEGER).map(|t| t.text().to_string())
    }
}

// ============================================================================
// Type expressions
// ============================================================================

/// The type written in front of a field name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Primitive(PrimitiveTypeExpr),
    Named(NamedTypeExpr),
    Collection(CollectionTypeExpr),
}

impl AstNode for TypeExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::PRIMITIVE_TYPE | SyntaxKind::NAMED_TYPE | SyntaxKind::COLLECTION_TYPE
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PRIMITIVE_TYPE => Some(Self::Primitive(PrimitiveTypeExpr(node))),
            SyntaxKind::NAMED_TYPE => Some(Self::Named(NamedTypeExpr(node))),
            SyntaxKind::COLLECTION_TYPE => Some(Self::Collection(CollectionTypeExpr(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Primitive(n) => n.syntax(),
            Self::Named(n) => n.syntax(),
            Self::Collection(n) => n.syntax(),
        }
    }
}

ast_node!(PrimitiveTypeExpr, PRIMITIVE_TYPE);

impl PrimitiveTypeExpr {
    pub fn primitive(&self) -> Option<PrimitiveType> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_primitive())
            .and_then(|t| PrimitiveType::from_name(t.text()))
    }
}

ast_node!(NamedTypeExpr, NAMED_TYPE);

impl NamedTypeExpr {
    first_child_method!(qualified_name, QualifiedName);
}

ast_node!(CollectionTypeExpr, COLLECTION_TYPE);

impl CollectionTypeExpr {
    token_to_enum_method!(kind, CollectionKind, [
        ARRAY_KW => Array,
        MATRIX_KW => Matrix,
        TENSOR_KW => Tensor,
    ]);
    first_child_method!(element, TypeExpr);
    children_method!(dimensions, Dimension);
}

ast_node!(Dimension, DIMENSION);

/// A dimension as written, before any range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionValue {
    Fixed(i64),
    Max(i64),
    Dynamic,
}

impl Dimension {
    has_token_method!(is_dynamic, QUESTION, "?");
    has_token_method!(is_max, MAX_KW, "max=100");

    /// Decode the dimension; `None` when the size literal is missing.
    ///
    /// Sizes beyond `i64` saturate; see [`Dimension::size_overflows`].
    pub fn value(&self) -> Option<DimensionValue> {
        if self.is_dynamic() {
            return Some(DimensionValue::Dynamic);
        }
        let size = saturate_i64(parse_integer_saturating(&self.size_text()?)?);
        if self.is_max() {
            Some(DimensionValue::Max(size))
        } else {
            Some(DimensionValue::Fixed(size))
        }
    }

    /// The size literal as written.
    pub fn size_text(&self) -> Option<String> {
        find_token(&self.0, SyntaxKind::INTEGER).map(|t| t.text().to_string())
    }

    pub fn size_overflows(&self) -> bool {
        self.size_text()
            .and_then(|text| text.parse::<i64>().err())
            .is_some_and(|err| {
                matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow)
            })
    }
}
