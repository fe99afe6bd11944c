//! Whole-run behavior: multi-file resolution, imports, fatal failures,
//! and loading from disk.

use std::path::PathBuf;

use lumos::parser::MsgParser;
use lumos::{Config, ErrorKind, SourceText, Validator};

use crate::helpers::source_fixtures::*;
use crate::helpers::validation_helpers::*;

fn on_disk(files: &[(&str, &str)]) -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), files);
    let config = Config::default().with_search_paths([dir.path()]);
    (dir, config)
}

// =============================================================================
// RESOLUTION
// =============================================================================

#[test]
fn test_sensor_project_validates() {
    let (dir, config) = on_disk(&[
        ("geometry/point.msg", GEOMETRY_POINT),
        ("sensor.msg", SENSOR),
    ]);
    let parser = MsgParser::from_config(&config);
    let mut validator = Validator::new(config, &parser);
    let result = validator.validate_directory(dir.path(), true).unwrap();

    assert_no_errors(&result);
    assert!(result.success);
    assert_eq!(result.files.len(), 2);
    assert_eq!(result.statistics.types, 3);
    assert_eq!(result.statistics.aliases, 1);
    assert_eq!(result.statistics.constants, 1);

    let order = result.import_order.unwrap();
    assert!(order[0].ends_with("geometry/point.msg"));
    assert!(order[1].ends_with("sensor.msg"));
}

#[test]
fn test_unknown_field_type() {
    let result = validate(&[("a.msg", "struct A\n    Vector3 v\n    array<Quat, 4> q\n")]);
    assert!(!result.success);
    let messages: Vec<&str> = result.errors.iter().map(|e| &*e.message).collect();
    assert_eq!(
        messages,
        vec![
            "Type 'Vector3' not found for field 'v' in 'A'",
            "Type 'Quat' not found for field 'q' in 'A'",
        ]
    );
}

#[test]
fn test_types_resolve_across_in_memory_files() {
    let result = validate(&[
        ("robot.msg", "using namespace common\n\nstruct Robot\n    Pose pose\n"),
        ("common.msg", "struct Pose\n    float64 x\n"),
    ]);
    assert_no_errors(&result);
}

// =============================================================================
// IMPORTS
// =============================================================================

#[test]
fn test_missing_import_reports_line() {
    let (dir, config) = on_disk(&[("main.msg", "// header\nimport does/not/exist\n")]);
    let parser = MsgParser::default();
    let mut validator = Validator::new(config, &parser);
    let result = validator.validate_files(&[dir.path().join("main.msg")]);

    let missing = result.of_kind(ErrorKind::ImportNotFound);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].line, 2);
    assert!(
        missing[0]
            .message
            .starts_with("Cannot resolve import 'does/not/exist'. File not found in search paths: [")
    );
}

#[test]
fn test_circular_imports() {
    let (dir, config) = on_disk(&[
        ("a.msg", "import b\n\nstruct A\n    int32 x\n"),
        ("b.msg", "// b\nimport a\n\nstruct B\n    int32 y\n"),
    ]);
    let parser = MsgParser::default();
    let mut validator = Validator::new(config, &parser);
    let result = validator.validate_directory(dir.path(), false).unwrap();

    let cycles = result.of_kind(ErrorKind::CircularDependency);
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        &*cycles[0].message,
        "Circular dependency detected: a.msg -> b.msg -> a.msg"
    );
    assert!(cycles[0].file.ends_with("a.msg"));
    assert_eq!(cycles[0].line, 1);
    assert_eq!(result.import_order, None);
}

// =============================================================================
// FATAL FAILURES
// =============================================================================

#[test]
fn test_syntax_error_stops_the_run() {
    let result = validate(&[
        ("bad.msg", "struct Bad\n    int32\n"),
        ("other.msg", "struct Other\n    Missing m\n"),
    ]);
    assert!(!result.success);
    assert!(
        result
            .errors
            .iter()
            .all(|e| e.kind == ErrorKind::SyntaxError)
    );
    assert!(result.of_kind(ErrorKind::TypeNotFound).is_empty());
    assert_eq!(result.statistics.files, 0);
}

#[test]
fn test_unreadable_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let present = write_tree(dir.path(), &[("p.msg", POINT)]);
    let parser = MsgParser::default();
    let mut validator = Validator::new(Config::default(), &parser);
    let result = validator.validate_files(&[present[0].clone(), dir.path().join("gone.msg")]);

    assert_eq!(kinds(&result.errors), vec![ErrorKind::FileNotFound]);
    assert!(result.files.is_empty());
}

#[test]
fn test_missing_directory_is_a_load_error() {
    let parser = MsgParser::default();
    let mut validator = Validator::new(Config::default(), &parser);
    assert!(
        validator
            .validate_directory(&PathBuf::from("/nonexistent/msgs"), true)
            .is_err()
    );
}

// =============================================================================
// REPORTING
// =============================================================================

#[test]
fn test_validator_is_reusable_between_runs() {
    let parser = MsgParser::default();
    let mut validator = Validator::new(Config::default(), &parser);

    let first = validator.validate_sources(vec![SourceText::new("a.msg", INT8_OVERFLOW)]);
    assert_eq!(first.error_count(), 1);

    let second = validator.validate_sources(vec![SourceText::new("p.msg", POINT)]);
    assert!(second.success);
    assert_eq!(second.statistics.types, 1);
    assert!(validator.symbols().get_type("p::P").is_some());
    assert!(validator.symbols().get_type("a::Small").is_none());
}

#[test]
fn test_grouping_and_report() {
    let result = validate(&[
        ("b.msg", "struct B\n    int32 x: 1\n    int32 y: 3\n"),
        ("a.msg", INT8_OVERFLOW),
    ]);
    let by_file = result.by_file();
    let files: Vec<String> = by_file.keys().map(|p| p.display().to_string()).collect();
    assert_eq!(files, vec!["a.msg", "b.msg"]);

    let by_kind = result.by_kind();
    assert_eq!(by_kind[&ErrorKind::EnumValueOutOfRange].len(), 1);
    assert_eq!(by_kind[&ErrorKind::FieldNumberGap].len(), 1);

    let report = result.format_report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("a.msg:3:5: error: enum_value_out_of_range:"));
    assert!(lines[1].starts_with("b.msg:2:5: warning: field_number_gap:"));
    assert_eq!(lines[2], "1 error(s), 1 warning(s)");
    assert_eq!(result.diagnostics_for_file(std::path::Path::new("b.msg")).len(), 1);
}
