//! The validation pipeline.
//!
//! A [`Validator`] owns the symbol table, the import resolver, and the
//! diagnostic collector for one run and walks them through a fixed sequence
//! of [`Phase`]s:
//!
//! ```text
//! Init → Extract → BuildSymbols → ValidateCollections → ResolveFieldTypes
//!      → ValidateStructured → ValidateImports → ValidateAttributes → Finalize
//! ```
//!
//! Any file that fails to transcode or parse sends the run straight from
//! Extract to Finalize.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::attributes::{AttributeValidator, SchemaRegistry};
use super::collections::CollectionValidator;
use super::enums::EnumValidator;
use super::fields::FieldValidator;
use super::naming::NamingValidator;
use crate::base::Position;
use crate::config::{Config, NamingRules};
use crate::hir::{
    Diagnostic, DiagnosticCollector, ErrorKind, ExtractOptions, ImportResolver, ResolvedType,
    SourceFile, SymbolStatistics, SymbolTable, TypeDefinition, TypeKind, TypeRef, detect_cycles,
    extract_file, format_cycle, import_order, normalize_path,
};
use crate::parser::{ParseFailure, SourceParser};
use crate::project::{self, LoadError, SourceText};

/// Pipeline stage a [`Validator`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    Extract,
    BuildSymbols,
    ValidateCollections,
    ResolveFieldTypes,
    ValidateStructured,
    ValidateImports,
    ValidateAttributes,
    Finalize,
}

/// Result of [`Validator::parse_sources`].
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub success: bool,
    pub files: IndexMap<PathBuf, Arc<SourceFile>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything a validation run produced.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// `true` when there are no errors. Warnings do not count.
    pub success: bool,
    pub files: IndexMap<PathBuf, Arc<SourceFile>>,
    pub errors: Vec<Diagnostic>,
    /// Warnings and infos.
    pub warnings: Vec<Diagnostic>,
    pub statistics: SymbolStatistics,
    /// Dependencies before dependents; `None` when imports form a cycle or
    /// the run stopped early.
    pub import_order: Option<Vec<PathBuf>>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Errors then warnings, each in report order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(&self.warnings)
    }

    pub fn of_kind(&self, kind: ErrorKind) -> Vec<&Diagnostic> {
        self.diagnostics().filter(|d| d.kind == kind).collect()
    }

    pub fn diagnostics_for_file(&self, path: &Path) -> Vec<&Diagnostic> {
        self.diagnostics().filter(|d| d.file == path).collect()
    }

    pub fn by_file(&self) -> IndexMap<&Path, Vec<&Diagnostic>> {
        let mut grouped: IndexMap<&Path, Vec<&Diagnostic>> = IndexMap::new();
        for diagnostic in self.diagnostics() {
            grouped.entry(diagnostic.file.as_path()).or_default().push(diagnostic);
        }
        grouped
    }

    pub fn by_kind(&self) -> IndexMap<ErrorKind, Vec<&Diagnostic>> {
        let mut grouped: IndexMap<ErrorKind, Vec<&Diagnostic>> = IndexMap::new();
        for diagnostic in self.diagnostics() {
            grouped.entry(diagnostic.kind).or_default().push(diagnostic);
        }
        grouped
    }

    /// `N error(s), M warning(s)`, or `No errors or warnings`.
    pub fn summary(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            "No errors or warnings".to_string()
        } else {
            format!(
                "{} error(s), {} warning(s)",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }

    /// One line per diagnostic followed by the summary.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        for diagnostic in self.diagnostics() {
            let _ = writeln!(report, "{diagnostic}");
        }
        report.push_str(&self.summary());
        report
    }
}

/// Runs the validation phases over a set of sources.
pub struct Validator<'p> {
    config: Config,
    parser: &'p dyn SourceParser,
    registry: SchemaRegistry,
    naming: Option<NamingRules>,
    symbols: SymbolTable,
    resolver: ImportResolver,
    collector: DiagnosticCollector,
    phase: Phase,
    files: Vec<Arc<SourceFile>>,
    /// Report rank of every path in the run.
    order: FxHashMap<PathBuf, usize>,
    import_order: Option<Vec<PathBuf>>,
}

/// Registry with every loadable document from `custom_schemas`.
fn load_custom_schemas(config: &Config) -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    for path in &config.attributes.custom_schemas {
        if let Err(e) = registry.load_path(path) {
            warn!(path = %path.display(), error = %e, "skipping custom schema");
        }
    }
    registry
}

impl<'p> Validator<'p> {
    pub fn new(config: Config, parser: &'p dyn SourceParser) -> Self {
        let naming = match config.naming.compile() {
            Ok(rules) => rules,
            Err(e) => {
                warn!(error = %e, "invalid naming pattern; naming checks disabled");
                None
            }
        };
        let resolver = ImportResolver::new(&config.search_paths);
        let registry = load_custom_schemas(&config);
        Self {
            config,
            parser,
            registry,
            naming,
            symbols: SymbolTable::new(),
            resolver,
            collector: DiagnosticCollector::new(),
            phase: Phase::Init,
            files: Vec::new(),
            order: FxHashMap::default(),
            import_order: None,
        }
    }

    /// Use `registry` for attribute schemas, replacing the schemas listed in
    /// `custom_schemas`.
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Symbols of the last run.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn validate_sources(&mut self, sources: Vec<SourceText>) -> ValidationResult {
        self.run(sources, Vec::new())
    }

    /// Read and validate `paths`. Unreadable files become `file_not_found`
    /// errors and stop the run after Extract.
    pub fn validate_files(&mut self, paths: &[PathBuf]) -> ValidationResult {
        let mut sources = Vec::new();
        let mut unreadable = Vec::new();
        for (path, loaded) in paths.iter().zip(project::load_sources(paths)) {
            match loaded {
                Ok(source) => sources.push(source),
                Err(e) => unreadable.push(Diagnostic::error(
                    path,
                    Position::default(),
                    ErrorKind::FileNotFound,
                    e.to_string(),
                )),
            }
        }
        self.run(sources, unreadable)
    }

    pub fn validate_directory(
        &mut self,
        dir: &Path,
        recursive: bool,
    ) -> Result<ValidationResult, LoadError> {
        let paths = project::collect_msg_files(dir, recursive)?;
        Ok(self.validate_files(&paths))
    }

    /// Transcode, parse, and extract without validating.
    pub fn parse_sources(&mut self, sources: Vec<SourceText>) -> ParseOutcome {
        let sources = self.init(sources, &[]);
        let extracted = self.extract(sources);
        let mut diagnostics = self.collector.take();
        self.sort_diagnostics(&mut diagnostics);
        ParseOutcome {
            success: !diagnostics.iter().any(Diagnostic::is_error),
            files: extracted
                .into_iter()
                .map(|file| (file.path.clone(), Arc::new(file)))
                .collect(),
            diagnostics,
        }
    }

    fn run(&mut self, sources: Vec<SourceText>, unreadable: Vec<Diagnostic>) -> ValidationResult {
        info!(files = sources.len() + unreadable.len(), "starting validation");
        let failed_paths: Vec<PathBuf> = unreadable.iter().map(|d| d.file.clone()).collect();
        let sources = self.init(sources, &failed_paths);
        let fatal_before = !unreadable.is_empty();
        self.collector.extend(unreadable);

        let extracted = self.extract(sources);
        let fatal = fatal_before || self.collector.has_errors();

        if fatal {
            debug!("extraction failed; skipping validation phases");
        } else {
            self.build_symbols(extracted);
            self.validate_collections();
            self.resolve_field_types();
            self.validate_structured();
            self.validate_imports();
            self.validate_attributes();
        }

        self.finalize()
    }

    fn enter(&mut self, phase: Phase) {
        debug!(?phase, "entering phase");
        self.phase = phase;
    }

    // ========================================================================
    // PHASES
    // ========================================================================

    fn init(&mut self, mut sources: Vec<SourceText>, failed: &[PathBuf]) -> Vec<SourceText> {
        self.enter(Phase::Init);
        self.symbols.clear();
        self.resolver.clear();
        self.collector.clear();
        self.files.clear();
        self.import_order = None;

        sources.sort_by(|a, b| a.path.cmp(&b.path));
        let mut paths: Vec<&PathBuf> = sources.iter().map(|s| &s.path).chain(failed).collect();
        paths.sort();
        self.order = paths
            .into_iter()
            .enumerate()
            .map(|(rank, path)| (path.clone(), rank))
            .collect();
        sources
    }

    fn extract(&mut self, sources: Vec<SourceText>) -> Vec<SourceFile> {
        self.enter(Phase::Extract);
        let options = ExtractOptions {
            search_paths: &self.config.search_paths,
        };
        let mut extracted = Vec::new();
        for source in sources {
            self.resolver.register_known_file(&source.path);
            match self.parser.parse(&source.text) {
                Ok(tree) => {
                    let result = extract_file(&source.path, &tree, &options);
                    self.collector.extend(result.findings);
                    extracted.push(result.file);
                }
                Err(ParseFailure::Indentation(e)) => self.collector.error(
                    &source.path,
                    Position::line_only(e.line),
                    ErrorKind::IndentationError,
                    e.to_string(),
                ),
                Err(ParseFailure::Syntax(errors)) => {
                    for error in errors {
                        self.collector.error(
                            &source.path,
                            error.position,
                            ErrorKind::SyntaxError,
                            error.message,
                        );
                    }
                }
            }
        }
        extracted
    }

    fn build_symbols(&mut self, extracted: Vec<SourceFile>) {
        self.enter(Phase::BuildSymbols);
        self.files = extracted
            .into_iter()
            .map(|file| self.symbols.register_file(file))
            .collect();
        for file in &self.files {
            self.symbols.register_definitions(file);
        }
    }

    fn validate_collections(&mut self) {
        self.enter(Phase::ValidateCollections);
        let validator = CollectionValidator::new();
        for file in &self.files {
            self.collector
                .extend(validator.validate(&file.path, &file.tree));
        }
    }

    fn resolve_field_types(&mut self) {
        self.enter(Phase::ResolveFieldTypes);
        for file in &self.files {
            for ty in &file.types {
                for field in ty.fields() {
                    let mut missing = Vec::new();
                    self.unresolved_names(&field.ty, file, &mut missing);
                    for name in missing {
                        self.collector.error(
                            &ty.file,
                            field.position,
                            ErrorKind::TypeNotFound,
                            format!(
                                "Type '{name}' not found for field '{}' in '{}'",
                                field.name, ty.name
                            ),
                        );
                    }
                }
            }
        }
    }

    /// Named types under `ty`, collection elements included, that resolve
    /// to nothing.
    fn unresolved_names(&self, ty: &TypeRef, file: &SourceFile, out: &mut Vec<Arc<str>>) {
        if let TypeRef::Collection(collection) = ty {
            self.unresolved_names(&collection.element, file, out);
            return;
        }
        if let ResolvedType::Unresolved(name) = self.symbols.resolve_type_ref(ty, file) {
            out.push(name);
        }
    }

    fn validate_structured(&mut self) {
        self.enter(Phase::ValidateStructured);
        let fields = FieldValidator::new(&self.config.validation, self.naming.as_ref());
        let enums = EnumValidator::new();
        for file in &self.files {
            for ty in &file.types {
                let findings = match ty.kind() {
                    TypeKind::Struct | TypeKind::Interface => fields.validate(ty),
                    TypeKind::Enum => enums.validate(ty),
                };
                self.collector.extend(findings);
            }
            if let Some(rules) = &self.naming {
                self.collector
                    .extend(NamingValidator::new(rules).validate(file));
            }
        }
    }

    fn validate_imports(&mut self) {
        self.enter(Phase::ValidateImports);
        for file in &self.files {
            for import in &file.imports {
                if self.resolver.resolve_import(&import.path, &file.path).is_none() {
                    let roots: Vec<String> = self
                        .resolver
                        .search_paths()
                        .iter()
                        .map(|p| format!("'{}'", p.display()))
                        .collect();
                    self.collector.error(
                        &file.path,
                        import.position,
                        ErrorKind::ImportNotFound,
                        format!(
                            "Cannot resolve import '{}'. File not found in search paths: [{}]",
                            import.path,
                            roots.join(", ")
                        ),
                    );
                }
            }
        }

        let graph = self.resolver.build_dependency_graph(&self.files);
        let by_normalized: FxHashMap<PathBuf, Arc<SourceFile>> = self
            .files
            .iter()
            .map(|f| (normalize_path(&f.path), Arc::clone(f)))
            .collect();

        for cycle in detect_cycles(&graph) {
            let Some(first) = cycle.first().and_then(|p| by_normalized.get(p)) else {
                continue;
            };
            let position = self.cycle_position(first, cycle.get(1));
            self.collector.error(
                &first.path,
                position,
                ErrorKind::CircularDependency,
                format_cycle(&cycle),
            );
        }

        self.import_order = import_order(&graph);
    }

    /// Position of the import in `file` that leads to `next`.
    fn cycle_position(&mut self, file: &SourceFile, next: Option<&PathBuf>) -> Position {
        let Some(next) = next else {
            return Position::default();
        };
        file.imports
            .iter()
            .find(|import| {
                self.resolver
                    .resolve_import(&import.path, &file.path)
                    .is_some_and(|target| &target == next)
            })
            .map(|import| import.position)
            .unwrap_or_default()
    }

    fn validate_attributes(&mut self) {
        self.enter(Phase::ValidateAttributes);
        let validator = AttributeValidator::new(&self.config.attributes, &self.registry);
        if !validator.is_active() {
            debug!("no attribute schemas enabled");
            return;
        }
        for file in &self.files {
            for ty in &file.types {
                self.collector.extend(check_type_attributes(&validator, ty));
            }
        }
    }

    fn finalize(&mut self) -> ValidationResult {
        self.enter(Phase::Finalize);
        let mut diagnostics = self.collector.take();
        self.sort_diagnostics(&mut diagnostics);
        let (errors, warnings): (Vec<_>, Vec<_>) =
            diagnostics.into_iter().partition(Diagnostic::is_error);

        let result = ValidationResult {
            success: errors.is_empty(),
            files: self
                .files
                .iter()
                .map(|f| (f.path.clone(), Arc::clone(f)))
                .collect(),
            errors,
            warnings,
            statistics: self.symbols.statistics(),
            import_order: self.import_order.take(),
        };
        info!(
            errors = result.error_count(),
            warnings = result.warning_count(),
            "validation finished"
        );
        result
    }

    /// Stable order: the file's rank in the run, then line.
    fn sort_diagnostics(&self, diagnostics: &mut [Diagnostic]) {
        diagnostics.sort_by_key(|d| {
            (
                self.order.get(&d.file).copied().unwrap_or(usize::MAX),
                d.line,
            )
        });
    }
}

fn check_type_attributes(validator: &AttributeValidator, ty: &TypeDefinition) -> Vec<Diagnostic> {
    let mut findings = validator.validate_type(ty);
    for field in ty.fields() {
        findings.extend(validator.validate_field(ty, field));
    }
    findings
}
