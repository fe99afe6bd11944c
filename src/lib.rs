//! # lumos-idl
//!
//! Front end for the indentation-based `.msg` interface definition language:
//! parsing, semantic extraction, import resolution, and validation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! validate  → Field, enum, collection, naming, attribute checks + pipeline
//!   ↓
//! project   → Reading sources from disk
//!   ↓
//! hir       → Semantic model, symbol table, import graph, diagnostics
//!   ↓
//! parser    → Indentation transcoder, logos lexer, rowan CST, typed AST
//!   ↓
//! config    → Serde-loadable settings
//!   ↓
//! base      → Primitives (Position, LineIndex, PrimitiveType)
//! ```
//!
//! ```no_run
//! use lumos::{Config, MsgParser, SourceText, Validator};
//!
//! let parser = MsgParser::default();
//! let mut validator = Validator::new(Config::default(), &parser);
//! let result = validator.validate_sources(vec![SourceText::new(
//!     "point.msg",
//!     "struct Point\n    float32 x\n    float32 y\n",
//! )]);
//! println!("{}", result.format_report());
//! ```

// ============================================================================
// MODULES (dependency order: base → config → parser → hir → project → validate)
// ============================================================================

/// Foundation types: positions, line index, primitive types
pub mod base;

/// Validation settings
pub mod config;

/// Parser: indentation transcoder, logos lexer, recursive-descent parser
pub mod parser;

/// High-level IR: semantic model, symbols, imports, diagnostics
pub mod hir;

/// Source loading
pub mod project;

/// Validators and the validation pipeline
pub mod validate;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Position, PrimitiveType, TextRange, TextSize};

pub use config::Config;
pub use hir::{Diagnostic, ErrorKind, Severity};
pub use parser::{MsgParser, SourceParser};
pub use project::SourceText;
pub use validate::{SchemaRegistry, ValidationResult, Validator};
