//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! of a transcoded `.msg` file.

/// All syntax kinds (tokens and nodes) of the `.msg` language
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation, block markers).
/// Nodes are composite (definitions, fields, attribute blocks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LINE STRUCTURE
    // =========================================================================
    NEWLINE, // \n
    INDENT,  // <INDENT>
    DEDENT,  // <DEDENT>

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,         // identifier
    INTEGER,       // 42, -7
    FLOAT,         // 3.14, 1e-3
    STRING,        // "hello" or 'hello'
    TRIPLE_STRING, // """hello"""

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    COLON,       // :
    COLON_COLON, // ::
    EQ,          // =
    COMMA,       // ,
    LT,          // <
    GT,          // >
    QUESTION,    // ?
    AT,          // @
    L_PAREN,     // (
    R_PAREN,     // )
    L_BRACKET,   // [
    R_BRACKET,   // ]
    SLASH,       // /
    DOT,         // .

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    IMPORT_KW,
    USING_KW,
    NAMESPACE_KW,
    CONST_KW,
    STRUCT_KW,
    INTERFACE_KW,
    ENUM_KW,
    OPTIONAL_KW,
    TRUE_KW,
    FALSE_KW,
    ARRAY_KW,
    MATRIX_KW,
    TENSOR_KW,
    MAX_KW,

    // =========================================================================
    // PRIMITIVE TYPE KEYWORDS
    // =========================================================================
    BOOL_KW,
    INT8_KW,
    INT16_KW,
    INT32_KW,
    INT64_KW,
    UINT8_KW,
    UINT16_KW,
    UINT32_KW,
    UINT64_KW,
    FLOAT32_KW,
    FLOAT64_KW,
    STRING_KW,
    BYTES_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    NAME,
    QUALIFIED_NAME,

    IMPORT,
    IMPORT_PATH,
    USING_NAMESPACE,
    NAMESPACE_ALIAS,
    USING_ALIAS,
    CONST_DEF,

    STRUCT_DEF,
    INTERFACE_DEF,
    ENUM_DEF,
    STORAGE_TYPE,
    DEF_BODY,

    FIELD,
    FIELD_NUMBER,
    ENUM_MEMBER,

    PRIMITIVE_TYPE,
    NAMED_TYPE,
    COLLECTION_TYPE,
    DIMENSION,

    ATTRIBUTE_BLOCK,
    ATTRIBUTE_LIST,
    ATTRIBUTE_ENTRY,
    INLINE_ATTRIBUTE,
    LITERAL,

    // Must be last
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::IMPORT_KW as u16) && (self as u16) <= (Self::BYTES_KW as u16)
    }

    /// Check if this is a primitive type keyword
    pub fn is_primitive(self) -> bool {
        (self as u16) >= (Self::BOOL_KW as u16) && (self as u16) <= (Self::BYTES_KW as u16)
    }

    /// Check if this is a collection keyword (`array`, `matrix`, `tensor`)
    pub fn is_collection(self) -> bool {
        matches!(self, Self::ARRAY_KW | Self::MATRIX_KW | Self::TENSOR_KW)
    }

    /// Check if this is a literal token usable as an attribute or constant value
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INTEGER
                | Self::FLOAT
                | Self::STRING
                | Self::TRIPLE_STRING
                | Self::TRUE_KW
                | Self::FALSE_KW
        )
    }

    /// Tokens that end a logical line
    pub fn is_line_end(self) -> bool {
        matches!(self, Self::NEWLINE | Self::DEDENT)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MsgLanguage {}

impl rowan::Language for MsgLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<MsgLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<MsgLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<MsgLanguage>;
