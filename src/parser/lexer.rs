//! Logos-based lexer for transcoded `.msg` text
//!
//! Fast tokenization using the logos crate. Newlines are significant (they end
//! statements), and the `<INDENT>` / `<DEDENT>` markers written by the
//! transcoder lex as dedicated tokens.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Offset one past the last byte of this token.
    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LINE STRUCTURE
    // =========================================================================
    #[token("\n")]
    Newline,

    #[token("<INDENT>")]
    Indent,

    #[token("<DEDENT>")]
    Dedent,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    #[regex(r#""""([^"]|"[^"]|""[^"])*""""#)]
    TripleString,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("::")]
    ColonColon,

    #[token(":")]
    Colon,

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("?")]
    Question,

    #[token("@")]
    At,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("/")]
    Slash,

    #[token(".")]
    Dot,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("import")]
    Import,
    #[token("using")]
    Using,
    #[token("namespace")]
    Namespace,
    #[token("const")]
    Const,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("optional")]
    Optional,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("array")]
    Array,
    #[token("matrix")]
    Matrix,
    #[token("tensor")]
    Tensor,
    #[token("max")]
    Max,

    // =========================================================================
    // PRIMITIVE TYPES
    // =========================================================================
    #[token("bool")]
    Bool,
    #[token("int8")]
    Int8,
    #[token("int16")]
    Int16,
    #[token("int32")]
    Int32,
    #[token("int64")]
    Int64,
    #[token("uint8")]
    Uint8,
    #[token("uint16")]
    Uint16,
    #[token("uint32")]
    Uint32,
    #[token("uint64")]
    Uint64,
    #[token("float32")]
    Float32,
    #[token("float64")]
    Float64,
    #[token("string")]
    StringType,
    #[token("bytes")]
    Bytes,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Line structure
            Newline => SyntaxKind::NEWLINE,
            Indent => SyntaxKind::INDENT,
            Dedent => SyntaxKind::DEDENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            Integer => SyntaxKind::INTEGER,
            Float => SyntaxKind::FLOAT,
            String => SyntaxKind::STRING,
            TripleString => SyntaxKind::TRIPLE_STRING,

            // Punctuation
            ColonColon => SyntaxKind::COLON_COLON,
            Colon => SyntaxKind::COLON,
            Eq => SyntaxKind::EQ,
            Comma => SyntaxKind::COMMA,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Question => SyntaxKind::QUESTION,
            At => SyntaxKind::AT,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            Slash => SyntaxKind::SLASH,
            Dot => SyntaxKind::DOT,

            // Keywords
            Import => SyntaxKind::IMPORT_KW,
            Using => SyntaxKind::USING_KW,
            Namespace => SyntaxKind::NAMESPACE_KW,
            Const => SyntaxKind::CONST_KW,
            Struct => SyntaxKind::STRUCT_KW,
            Interface => SyntaxKind::INTERFACE_KW,
            Enum => SyntaxKind::ENUM_KW,
            Optional => SyntaxKind::OPTIONAL_KW,
            True => SyntaxKind::TRUE_KW,
            False => SyntaxKind::FALSE_KW,
            Array => SyntaxKind::ARRAY_KW,
            Matrix => SyntaxKind::MATRIX_KW,
            Tensor => SyntaxKind::TENSOR_KW,
            Max => SyntaxKind::MAX_KW,

            // Primitive types
            Bool => SyntaxKind::BOOL_KW,
            Int8 => SyntaxKind::INT8_KW,
            Int16 => SyntaxKind::INT16_KW,
            Int32 => SyntaxKind::INT32_KW,
            Int64 => SyntaxKind::INT64_KW,
            Uint8 => SyntaxKind::UINT8_KW,
            Uint16 => SyntaxKind::UINT16_KW,
            Uint32 => SyntaxKind::UINT32_KW,
            Uint64 => SyntaxKind::UINT64_KW,
            Float32 => SyntaxKind::FLOAT32_KW,
            Float64 => SyntaxKind::FLOAT64_KW,
            StringType => SyntaxKind::STRING_KW,
            Bytes => SyntaxKind::BYTES_KW,
        }
    }
}
