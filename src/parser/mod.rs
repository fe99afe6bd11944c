//! Rowan-based parser for `.msg` sources
//!
//! This module provides a lossless parser using:
//! - the **indentation transcoder** to turn indentation into block markers
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Transcoder → text with <INDENT>/<DEDENT> lines + SourceMap
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//!     ↓
//! HIR → Semantic model
//! ```
//!
//! The semantic layers only depend on the [`SourceParser`] trait; [`MsgParser`]
//! is the implementation shipped with the crate.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod indent;
mod lexer;
mod syntax_kind;

pub use ast::*;
pub use indent::{IndentationError, SourceMap, Transcoded, Transcoder};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{MsgLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};

use crate::base::{LineIndex, Position};

/// A syntax error translated to source coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSyntaxError {
    pub message: String,
    pub position: Position,
}

/// Why a source text could not be turned into a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Indentation(#[from] IndentationError),
    #[error("{} syntax error(s)", .0.len())]
    Syntax(Vec<LocatedSyntaxError>),
}

/// A parsed file: the syntax tree plus everything needed to report
/// positions in original source coordinates.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    green: GreenNode,
    source_map: SourceMap,
    line_index: LineIndex,
    errors: Vec<SyntaxError>,
}

impl ParsedSource {
    pub fn new(parse: Parse, transcoded: &Transcoded) -> Self {
        Self {
            green: parse.green,
            source_map: transcoded.source_map.clone(),
            line_index: LineIndex::new(&transcoded.text),
            errors: parse.errors,
        }
    }

    /// Get the root syntax node
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Source position of an offset into the transcoded text.
    pub fn position(&self, offset: TextSize) -> Position {
        self.source_map.position(self.line_index.line_col(offset))
    }

    /// Source position of the first significant token of `node`.
    pub fn node_position(&self, node: &SyntaxNode) -> Position {
        let offset = ast::first_significant_token(node)
            .map(|t| t.text_range().start())
            .unwrap_or_else(|| node.text_range().start());
        self.position(offset)
    }

    /// Syntax errors in source coordinates.
    pub fn located_errors(&self) -> Vec<LocatedSyntaxError> {
        self.errors
            .iter()
            .map(|e| LocatedSyntaxError {
                message: e.message.clone(),
                position: self.position(e.range.start()),
            })
            .collect()
    }
}

/// The grammar capability used by the validation pipeline.
///
/// Implementations turn raw `.msg` text into a syntax tree of the grammar in
/// [`parser`](self) and must reject any text with indentation or syntax errors.
pub trait SourceParser {
    fn parse(&self, text: &str) -> Result<ParsedSource, ParseFailure>;
}

/// Transcoder + logos lexer + recursive-descent parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgParser {
    transcoder: Transcoder,
}

impl MsgParser {
    pub fn new(tab_size: usize) -> Self {
        Self {
            transcoder: Transcoder::new(tab_size),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.tab_size)
    }

    /// Parse and keep the tree even when it has syntax errors.
    pub fn parse_lenient(&self, text: &str) -> Result<ParsedSource, IndentationError> {
        let transcoded = self.transcoder.transcode(text)?;
        let parse = parse(&transcoded.text);
        Ok(ParsedSource::new(parse, &transcoded))
    }
}

impl SourceParser for MsgParser {
    fn parse(&self, text: &str) -> Result<ParsedSource, ParseFailure> {
        let parsed = self.parse_lenient(text)?;
        if parsed.ok() {
            Ok(parsed)
        } else {
            Err(ParseFailure::Syntax(parsed.located_errors()))
        }
    }
}
