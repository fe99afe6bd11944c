//! Recursive descent parser for transcoded `.msg` text
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse transcoded `.msg` text into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// What a definition body contains besides its optional `[attributes]` block.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Fields,
    Members,
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// Index of the n-th non-trivia token at or after `pos`.
    fn nth_index(&self, n: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, t)| !t.kind.is_trivia())
            .nth(n)
            .map(|(idx, _)| idx)
    }

    fn current(&self) -> Option<&Token<'a>> {
        self.nth_index(0).map(|idx| &self.tokens[idx])
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    /// Kind of the very next token, trivia included.
    fn raw_kind(&self) -> Option<SyntaxKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.nth_index(0).is_none()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    /// First kind that is neither trivia nor a newline.
    fn peek_past_newlines(&self) -> Option<SyntaxKind> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .find(|k| !k.is_trivia() && *k != SyntaxKind::NEWLINE)
    }

    /// Identifiers and keywords other than `true`/`false` can name things.
    fn at_name(&self) -> bool {
        let kind = self.current_kind();
        !self.at_eof()
            && (kind == SyntaxKind::IDENT
                || (kind.is_keyword() && !matches!(kind, SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW)))
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Push exactly the next token (trivia included) into the tree.
    fn bump_raw(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Push leading trivia, then the current significant token.
    fn bump(&mut self) {
        self.skip_trivia();
        self.bump_raw();
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}, found {:?}", kind, self.found()));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.raw_kind().is_some_and(|k| k.is_trivia()) {
            self.bump_raw();
        }
    }

    fn skip_newlines(&mut self) {
        while self.at(SyntaxKind::NEWLINE) {
            self.bump();
        }
    }

    /// A statement ends at a newline, or implicitly before a dedent or EOF.
    fn expect_line_end(&mut self) {
        if self.eat(SyntaxKind::NEWLINE) || self.at_eof() || self.at(SyntaxKind::DEDENT) {
            return;
        }
        self.error_recover(
            format!("expected end of line, found {:?}", self.found()),
            &[SyntaxKind::NEWLINE, SyntaxKind::DEDENT],
        );
        self.eat(SyntaxKind::NEWLINE);
    }

    fn found(&self) -> String {
        if self.at_eof() {
            "end of file".to_string()
        } else {
            format!("'{}'", self.current_text())
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .or_else(|| {
                self.tokens
                    .last()
                    .map(|t| TextRange::empty(t.end()))
            })
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            if self.at(SyntaxKind::INDENT) {
                self.skip_block();
            } else {
                self.bump();
            }
            consumed = true;
        }
        if !consumed && !self.at_eof() && !self.at_any(&[SyntaxKind::NEWLINE, SyntaxKind::DEDENT])
        {
            self.bump();
        }
        self.builder.finish_node();
    }

    /// Consume a whole `<INDENT> ... <DEDENT>` block, nested blocks included.
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::INDENT => depth += 1,
                SyntaxKind::DEDENT => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
            if depth == 0 {
                break;
            }
        }
    }

    /// Report an unexpected indented block and wrap it in an ERROR node.
    fn unexpected_block(&mut self) {
        self.error("unexpected indentation");
        self.start_node(SyntaxKind::ERROR);
        self.skip_block();
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = (NEWLINE | Item)*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        loop {
            self.skip_newlines();
            if self.at_eof() {
                break;
            }
            let pos_before = self.pos;
            self.parse_item();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
        self.skip_trivia();

        self.finish_node();
    }

    /// Item = Import | UsingNamespace | NamespaceAlias | UsingAlias | Const
    ///      | Struct | Interface | Enum
    fn parse_item(&mut self) {
        match self.current_kind() {
            SyntaxKind::IMPORT_KW => self.parse_import(),
            SyntaxKind::USING_KW if self.nth(1) == SyntaxKind::NAMESPACE_KW => {
                self.parse_using_namespace()
            }
            SyntaxKind::USING_KW => self.parse_using_alias(),
            SyntaxKind::NAMESPACE_KW => self.parse_namespace_alias(),
            SyntaxKind::CONST_KW => self.parse_const(),
            SyntaxKind::STRUCT_KW => self.parse_record(SyntaxKind::STRUCT_DEF),
            SyntaxKind::INTERFACE_KW => self.parse_record(SyntaxKind::INTERFACE_DEF),
            SyntaxKind::ENUM_KW => self.parse_enum(),
            SyntaxKind::INDENT => self.unexpected_block(),
            SyntaxKind::DEDENT => {
                self.error("unexpected dedent");
                self.bump();
            }
            _ => self.error_recover(
                format!("expected a top-level statement, found {}", self.found()),
                &[SyntaxKind::NEWLINE],
            ),
        }
    }

    /// Import = 'import' ImportPath
    fn parse_import(&mut self) {
        self.start_node(SyntaxKind::IMPORT);
        self.expect(SyntaxKind::IMPORT_KW);
        self.parse_import_path();
        self.expect_line_end();
        self.finish_node();
    }

    /// ImportPath = Segment ('/' Segment)*
    ///
    /// A segment is a run of adjacent identifier, keyword, number, or `.`
    /// tokens; whitespace ends the path.
    fn parse_import_path(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::IMPORT_PATH);
        loop {
            let mut segment_len = 0;
            while self.raw_kind().is_some_and(is_path_piece) {
                self.bump_raw();
                segment_len += 1;
            }
            if segment_len == 0 {
                self.error("empty import path segment");
            }
            if self.raw_kind() == Some(SyntaxKind::SLASH) {
                self.bump_raw();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// UsingNamespace = 'using' 'namespace' QualifiedName
    fn parse_using_namespace(&mut self) {
        self.start_node(SyntaxKind::USING_NAMESPACE);
        self.expect(SyntaxKind::USING_KW);
        self.expect(SyntaxKind::NAMESPACE_KW);
        self.parse_qualified_name();
        self.expect_line_end();
        self.finish_node();
    }

    /// NamespaceAlias = 'namespace' Name '=' QualifiedName
    fn parse_namespace_alias(&mut self) {
        self.start_node(SyntaxKind::NAMESPACE_ALIAS);
        self.expect(SyntaxKind::NAMESPACE_KW);
        self.parse_name();
        self.expect(SyntaxKind::EQ);
        self.parse_qualified_name();
        self.expect_line_end();
        self.finish_node();
    }

    /// UsingAlias = 'using' Name '=' PrimitiveType
    fn parse_using_alias(&mut self) {
        self.start_node(SyntaxKind::USING_ALIAS);
        self.expect(SyntaxKind::USING_KW);
        self.parse_name();
        self.expect(SyntaxKind::EQ);
        if !self.parse_primitive_type() {
            self.error(format!(
                "alias target must be a primitive type, found {}",
                self.found()
            ));
        }
        self.expect_line_end();
        self.finish_node();
    }

    /// Const = 'const' PrimitiveType Name '=' Literal
    fn parse_const(&mut self) {
        self.start_node(SyntaxKind::CONST_DEF);
        self.expect(SyntaxKind::CONST_KW);
        if !self.parse_primitive_type() {
            self.error(format!(
                "constant type must be a primitive type, found {}",
                self.found()
            ));
        }
        self.parse_name();
        self.expect(SyntaxKind::EQ);
        self.parse_literal();
        self.expect_line_end();
        self.finish_node();
    }

    /// Struct | Interface = kw Name NEWLINE DefBody
    fn parse_record(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.parse_name();
        self.expect_line_end();
        if self.peek_past_newlines() == Some(SyntaxKind::INDENT) {
            self.parse_def_body(BodyKind::Fields);
        } else {
            self.error("expected an indented body with at least one field");
        }
        self.finish_node();
    }

    /// Enum = 'enum' Name (':' StorageType)? NEWLINE DefBody?
    ///
    /// The body is optional here so that an empty enum reaches semantic
    /// validation instead of failing to parse.
    fn parse_enum(&mut self) {
        self.start_node(SyntaxKind::ENUM_DEF);
        self.expect(SyntaxKind::ENUM_KW);
        self.parse_name();
        if self.at(SyntaxKind::COLON) {
            self.start_node(SyntaxKind::STORAGE_TYPE);
            self.bump();
            if self.at_name() {
                self.bump();
            } else {
                self.error(format!("expected storage type, found {}", self.found()));
            }
            self.finish_node();
        }
        self.expect_line_end();
        if self.peek_past_newlines() == Some(SyntaxKind::INDENT) {
            self.parse_def_body(BodyKind::Members);
        }
        self.finish_node();
    }

    /// DefBody = INDENT AttributeBlock? (Field | EnumMember)+ DEDENT
    fn parse_def_body(&mut self, body: BodyKind) {
        self.skip_newlines();
        self.start_node(SyntaxKind::DEF_BODY);
        self.expect(SyntaxKind::INDENT);

        let mut entries = 0;
        loop {
            self.skip_newlines();
            if self.eat(SyntaxKind::DEDENT) {
                break;
            }
            if self.at_eof() {
                self.error("unterminated block");
                break;
            }
            let pos_before = self.pos;
            match (self.current_kind(), body) {
                (SyntaxKind::L_BRACKET, _) => self.parse_attribute_block(),
                (SyntaxKind::INDENT, _) => self.unexpected_block(),
                (_, BodyKind::Fields) => {
                    self.parse_field();
                    entries += 1;
                }
                (_, BodyKind::Members) => {
                    self.parse_enum_member();
                    entries += 1;
                }
            }
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
        if entries == 0 && body == BodyKind::Fields {
            self.error("expected at least one field");
        }

        self.finish_node();
    }

    /// AttributeBlock = '[' 'attributes' ']' NEWLINE AttributeList
    fn parse_attribute_block(&mut self) {
        self.start_node(SyntaxKind::ATTRIBUTE_BLOCK);
        self.expect(SyntaxKind::L_BRACKET);
        if self.at(SyntaxKind::IDENT) && self.current_text() == "attributes" {
            self.bump();
        } else {
            self.error(format!("expected 'attributes', found {}", self.found()));
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.expect_line_end();
        if self.peek_past_newlines() == Some(SyntaxKind::INDENT) {
            self.parse_attribute_list();
        } else {
            self.error("expected an indented attribute list");
        }
        self.finish_node();
    }

    /// Field = 'optional'? Type Name FieldNumber? InlineAttributes? NEWLINE AttributeList?
    fn parse_field(&mut self) {
        self.start_node(SyntaxKind::FIELD);
        self.eat(SyntaxKind::OPTIONAL_KW);

        if self.parse_type() {
            self.parse_name();
            if self.at(SyntaxKind::COLON) {
                self.start_node(SyntaxKind::FIELD_NUMBER);
                self.bump();
                self.expect(SyntaxKind::INTEGER);
                self.finish_node();
            }
            if self.at(SyntaxKind::AT) {
                self.parse_inline_attribute();
                while self.eat(SyntaxKind::COMMA) {
                    self.parse_inline_attribute();
                }
            }
            self.expect_line_end();
        } else {
            self.error_recover(
                format!("expected field type, found {}", self.found()),
                &[SyntaxKind::NEWLINE, SyntaxKind::DEDENT],
            );
            self.eat(SyntaxKind::NEWLINE);
        }

        if self.peek_past_newlines() == Some(SyntaxKind::INDENT) {
            self.parse_attribute_list();
        }
        self.finish_node();
    }

    /// EnumMember = Name ('=' INTEGER)?
    fn parse_enum_member(&mut self) {
        self.start_node(SyntaxKind::ENUM_MEMBER);
        self.parse_name();
        if self.eat(SyntaxKind::EQ) && !self.eat(SyntaxKind::INTEGER) {
            self.error(format!("expected integer value, found {}", self.found()));
        }
        self.expect_line_end();
        self.finish_node();
    }

    /// InlineAttribute = '@' Name '(' Literal ')'
    fn parse_inline_attribute(&mut self) {
        self.start_node(SyntaxKind::INLINE_ATTRIBUTE);
        self.expect(SyntaxKind::AT);
        self.parse_name();
        self.expect(SyntaxKind::L_PAREN);
        self.parse_literal();
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// AttributeList = INDENT AttributeEntry+ DEDENT
    fn parse_attribute_list(&mut self) {
        self.skip_newlines();
        self.start_node(SyntaxKind::ATTRIBUTE_LIST);
        self.expect(SyntaxKind::INDENT);
        loop {
            self.skip_newlines();
            if self.eat(SyntaxKind::DEDENT) {
                break;
            }
            if self.at_eof() {
                self.error("unterminated attribute block");
                break;
            }
            let pos_before = self.pos;
            if self.at(SyntaxKind::INDENT) {
                self.unexpected_block();
            } else {
                self.parse_attribute_entry();
            }
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
        self.finish_node();
    }

    /// AttributeEntry = Name ':' (Literal NEWLINE | NEWLINE AttributeList)
    fn parse_attribute_entry(&mut self) {
        self.start_node(SyntaxKind::ATTRIBUTE_ENTRY);
        if !self.at_name() {
            self.error_recover(
                format!("expected attribute name, found {}", self.found()),
                &[SyntaxKind::NEWLINE, SyntaxKind::DEDENT],
            );
            self.eat(SyntaxKind::NEWLINE);
            self.finish_node();
            return;
        }
        self.parse_name();
        self.expect(SyntaxKind::COLON);
        if self.current_kind().is_literal() && !self.at_eof() {
            self.parse_literal();
            self.expect_line_end();
        } else {
            self.expect_line_end();
            if self.peek_past_newlines() == Some(SyntaxKind::INDENT) {
                self.parse_attribute_list();
            } else {
                self.error("expected a value or a nested attribute block");
            }
        }
        self.finish_node();
    }

    /// Type = PrimitiveType | CollectionType | NamedType
    fn parse_type(&mut self) -> bool {
        let kind = self.current_kind();
        if self.at_eof() {
            return false;
        }
        if kind.is_primitive() {
            self.parse_primitive_type()
        } else if kind.is_collection() && self.nth(1) == SyntaxKind::LT {
            self.parse_collection_type();
            true
        } else if kind == SyntaxKind::IDENT {
            self.start_node(SyntaxKind::NAMED_TYPE);
            self.parse_qualified_name();
            self.finish_node();
            true
        } else {
            false
        }
    }

    fn parse_primitive_type(&mut self) -> bool {
        if !self.current_kind().is_primitive() || self.at_eof() {
            return false;
        }
        self.start_node(SyntaxKind::PRIMITIVE_TYPE);
        self.bump();
        self.finish_node();
        true
    }

    /// CollectionType = ('array' | 'matrix' | 'tensor') '<' Type (',' Dimension)* '>'
    fn parse_collection_type(&mut self) {
        self.start_node(SyntaxKind::COLLECTION_TYPE);
        self.bump();
        self.expect(SyntaxKind::LT);
        if !self.parse_type() {
            self.error(format!("expected element type, found {}", self.found()));
        }
        while self.eat(SyntaxKind::COMMA) {
            self.parse_dimension();
        }
        self.expect(SyntaxKind::GT);
        self.finish_node();
    }

    /// Dimension = INTEGER | '?' | 'max' '=' INTEGER
    fn parse_dimension(&mut self) {
        self.start_node(SyntaxKind::DIMENSION);
        match self.current_kind() {
            SyntaxKind::INTEGER | SyntaxKind::QUESTION if !self.at_eof() => self.bump(),
            SyntaxKind::MAX_KW if !self.at_eof() => {
                self.bump();
                self.expect(SyntaxKind::EQ);
                self.expect(SyntaxKind::INTEGER);
            }
            _ => self.error(format!("expected dimension, found {}", self.found())),
        }
        self.finish_node();
    }

    /// QualifiedName = IDENT ('::' IDENT)*
    fn parse_qualified_name(&mut self) {
        self.start_node(SyntaxKind::QUALIFIED_NAME);
        if self.at_name() {
            self.bump();
        } else {
            self.error(format!("expected name, found {}", self.found()));
        }
        while self.at(SyntaxKind::COLON_COLON) {
            self.bump();
            if self.at_name() {
                self.bump();
            } else {
                self.error(format!("expected name after '::', found {}", self.found()));
                break;
            }
        }
        self.finish_node();
    }

    fn parse_name(&mut self) {
        self.start_node(SyntaxKind::NAME);
        if self.at_name() {
            self.bump();
        } else {
            self.error(format!("expected name, found {}", self.found()));
        }
        self.finish_node();
    }

    fn parse_literal(&mut self) {
        if self.current_kind().is_literal() && !self.at_eof() {
            self.start_node(SyntaxKind::LITERAL);
            self.bump();
            self.finish_node();
        } else {
            self.error(format!("expected a literal value, found {}", self.found()));
        }
    }
}

/// Tokens that may appear inside one import path segment.
fn is_path_piece(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::IDENT
        || kind == SyntaxKind::INTEGER
        || kind == SyntaxKind::FLOAT
        || kind == SyntaxKind::DOT
        || kind.is_keyword()
}
