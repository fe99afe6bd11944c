//! Parser layer tests
//!
//! Tests for the indentation transcoder and the rowan parser:
//! - Marker balance and idempotence
//! - Verbatim handling of multi-line strings
//! - Typed AST access over parsed sources

pub mod tests_ast;
pub mod tests_transcoder;
