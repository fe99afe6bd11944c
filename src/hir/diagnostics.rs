//! Diagnostics — validation error reporting.
//!
//! Every finding produced by the pipeline is a [`Diagnostic`] carrying a
//! machine-readable [`ErrorKind`], a severity, and a 1-based source position.
//! Validators push into a [`DiagnosticCollector`]; the orchestrator drains it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::base::Position;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable category of a diagnostic.
///
/// The string form (see [`ErrorKind::as_str`]) is stable and is what reports
/// and JSON output carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // Parsing
    IndentationError,
    SyntaxError,
    FileNotFound,
    MalformedConstruct,

    // Types
    TypeNotFound,

    // Fields
    FieldNumberingInconsistent,
    FieldNumberingRequired,
    DuplicateFieldNumber,
    NegativeFieldNumber,
    FieldNumberTooLarge,
    FieldNumberGap,
    DuplicateFieldName,
    InvalidFieldName,
    InvalidTypeName,
    InvalidConstantName,

    // Enums
    InvalidEnumStorageType,
    EmptyEnum,
    DuplicateEnumMemberName,
    DuplicateEnumValue,
    EnumValueOutOfRange,

    // Collections
    InvalidCollectionSize,
    InvalidMatrixDimensions,
    InvalidTensorDimensions,

    // Imports
    ImportNotFound,
    CircularDependency,

    // Attributes
    InvalidAttribute,
    UnknownAttribute,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::IndentationError => "indentation_error",
            ErrorKind::SyntaxError => "syntax_error",
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::MalformedConstruct => "malformed_construct",
            ErrorKind::TypeNotFound => "type_not_found",
            ErrorKind::FieldNumberingInconsistent => "field_numbering_inconsistent",
            ErrorKind::FieldNumberingRequired => "field_numbering_required",
            ErrorKind::DuplicateFieldNumber => "duplicate_field_number",
            ErrorKind::NegativeFieldNumber => "negative_field_number",
            ErrorKind::FieldNumberTooLarge => "field_number_too_large",
            ErrorKind::FieldNumberGap => "field_number_gap",
            ErrorKind::DuplicateFieldName => "duplicate_field_name",
            ErrorKind::InvalidFieldName => "invalid_field_name",
            ErrorKind::InvalidTypeName => "invalid_type_name",
            ErrorKind::InvalidConstantName => "invalid_constant_name",
            ErrorKind::InvalidEnumStorageType => "invalid_enum_storage_type",
            ErrorKind::EmptyEnum => "empty_enum",
            ErrorKind::DuplicateEnumMemberName => "duplicate_enum_member_name",
            ErrorKind::DuplicateEnumValue => "duplicate_enum_value",
            ErrorKind::EnumValueOutOfRange => "enum_value_out_of_range",
            ErrorKind::InvalidCollectionSize => "invalid_collection_size",
            ErrorKind::InvalidMatrixDimensions => "invalid_matrix_dimensions",
            ErrorKind::InvalidTensorDimensions => "invalid_tensor_dimensions",
            ErrorKind::ImportNotFound => "import_not_found",
            ErrorKind::CircularDependency => "circular_dependency",
            ErrorKind::InvalidAttribute => "invalid_attribute",
            ErrorKind::UnknownAttribute => "unknown_attribute",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: PathBuf,
    /// 1-based line; 0 when unknown.
    pub line: u32,
    /// 1-based column; 0 when unknown.
    pub column: u32,
    /// Severity level.
    pub severity: Severity,
    pub kind: ErrorKind,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(
        file: impl Into<PathBuf>,
        position: Position,
        kind: ErrorKind,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file: file.into(),
            line: position.line,
            column: position.column,
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        file: impl Into<PathBuf>,
        position: Position,
        kind: ErrorKind,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::error(file, position, kind, message).with_severity(Severity::Warning)
    }

    /// Override the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}: {}",
            self.file.display(),
            self.line,
            self.column,
            self.severity,
            self.kind,
            self.message
        )
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during validation.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(
        &mut self,
        file: &Path,
        position: Position,
        kind: ErrorKind,
        message: impl Into<Arc<str>>,
    ) {
        self.add(Diagnostic::error(file, position, kind, message));
    }

    pub fn warning(
        &mut self,
        file: &Path,
        position: Position,
        kind: ErrorKind,
        message: impl Into<Arc<str>>,
    ) {
        self.add(Diagnostic::warning(file, position, kind, message));
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics for a specific file.
    pub fn diagnostics_for_file(&self, file: &Path) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.file == file).collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clear all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl Extend<Diagnostic> for DiagnosticCollector {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}
