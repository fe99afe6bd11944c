//! Running the front end over in-memory and on-disk sources.

use std::fs;
use std::path::{Path, PathBuf};

use lumos::hir::{Diagnostic, ErrorKind, ExtractOptions, Extracted, extract_file};
use lumos::{Config, MsgParser, SchemaRegistry, SourceParser, SourceText, ValidationResult, Validator};

/// Parse and extract one source without validating it.
pub fn extract(path: &str, source: &str) -> Extracted {
    let parsed = MsgParser::default()
        .parse(source)
        .unwrap_or_else(|e| panic!("{path} failed to parse: {e}"));
    extract_file(Path::new(path), &parsed, &ExtractOptions::default())
}

/// Validate in-memory sources with `config`.
pub fn validate_with(config: Config, sources: &[(&str, &str)]) -> ValidationResult {
    validate_with_registry(config, SchemaRegistry::new(), sources)
}

pub fn validate_with_registry(
    config: Config,
    registry: SchemaRegistry,
    sources: &[(&str, &str)],
) -> ValidationResult {
    let parser = MsgParser::from_config(&config);
    let mut validator = Validator::new(config, &parser).with_registry(registry);
    validator.validate_sources(
        sources
            .iter()
            .map(|(path, text)| SourceText::new(*path, *text))
            .collect(),
    )
}

/// Validate in-memory sources with the default configuration.
pub fn validate(sources: &[(&str, &str)]) -> ValidationResult {
    validate_with(Config::default(), sources)
}

pub fn kinds(diagnostics: &[Diagnostic]) -> Vec<ErrorKind> {
    diagnostics.iter().map(|d| d.kind).collect()
}

/// Assert a run has no errors, printing them otherwise.
pub fn assert_no_errors(result: &ValidationResult) {
    assert!(
        result.errors.is_empty(),
        "Expected no errors, got {} error(s):\n{}",
        result.errors.len(),
        result
            .errors
            .iter()
            .map(|e| format!("  {e}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Write `files` (relative path, contents) under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(relative, contents)| {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, contents).unwrap();
            path
        })
        .collect()
}
