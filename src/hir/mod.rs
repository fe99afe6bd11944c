//! High-level IR (HIR) — Semantic model of `.msg` files.
//!
//! This module turns parsed syntax trees into definitions that validators can
//! reason about, and indexes them across files.
//!
//! ## Key Types
//!
//! - [`SourceFile`] — Everything extracted from one file
//! - [`TypeDefinition`] — A struct, interface, or enum
//! - [`SymbolTable`] — Run-wide index for name resolution
//! - [`ImportResolver`] — Import path resolution and the dependency graph
//! - [`Diagnostic`] — A finding with kind, severity, and position
//!
//! ## Layers
//!
//! ```text
//! ParsedSource              ← syntax tree + source map
//!     │
//!     ▼
//! extract_file(path)        ← SourceFile (per file)
//!     │
//!     ▼
//! SymbolTable               ← run-wide index
//!     │
//!     ▼
//! resolve_type_ref(ty, cx)  ← name resolution
//!     │
//!     ▼
//! DependencyGraph           ← imports, cycles, order
//! ```

mod diagnostics;
mod extract;
mod imports;
mod model;
mod symbols;

pub use diagnostics::{Diagnostic, DiagnosticCollector, ErrorKind, Severity};
pub use extract::{ExtractOptions, Extracted, derive_namespace, extract_file};
pub use imports::{
    DependencyGraph, ImportResolver, detect_cycles, format_cycle, import_order, normalize_path,
    transitive_dependencies,
};
pub use model::{
    AliasDefinition, AttributeMap, AttributeValue, CollectionType, ConstantDefinition, Dimension,
    EnumBody, EnumMember, Field, Import, SourceFile, TypeBody, TypeDefinition, TypeKind, TypeRef,
    qualify,
};
pub use symbols::{ResolvedType, SymbolStatistics, SymbolTable};
