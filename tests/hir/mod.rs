//! HIR layer tests
//!
//! Tests for the semantic model:
//! - Extraction of types, enums, constants and aliases
//! - Symbol lookup across files and namespaces
//! - Import resolution on disk and the dependency graph

pub mod tests_extraction;
pub mod tests_imports;
pub mod tests_symbols;
