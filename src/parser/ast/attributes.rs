use super::*;

// ============================================================================
// Attribute blocks
// ============================================================================

ast_node!(AttributeBlock, ATTRIBUTE_BLOCK);

impl AttributeBlock {
    first_child_method!(list, AttributeList);
}

ast_node!(AttributeList, ATTRIBUTE_LIST);

impl AttributeList {
    children_method!(entries, AttributeEntry);
}

ast_node!(AttributeEntry, ATTRIBUTE_ENTRY);

impl AttributeEntry {
    first_child_method!(name, Name);
    first_child_method!(value, Literal);
    first_child_method!(nested, AttributeList);
}

ast_node!(InlineAttribute, INLINE_ATTRIBUTE);

impl InlineAttribute {
    first_child_method!(name, Name);
    first_child_method!(value, Literal);
}

// ============================================================================
// Literals
// ============================================================================

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_literal())
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.token().map(|t| t.kind())
    }
}
