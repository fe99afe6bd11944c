//! Structural rules as seen through a full validation run.

use lumos::config::{NamingConfig, ValidationConfig};
use lumos::{Config, ErrorKind, Severity};
use rstest::rstest;

use crate::helpers::source_fixtures::*;
use crate::helpers::validation_helpers::*;

// =============================================================================
// FIELD NUMBERING
// =============================================================================

#[rstest]
#[case(MIXED_NUMBERING)]
#[case("struct Mixed\n    int32 a\n    int32 b: 1\n")]
#[case("struct Mixed\n    int32 a: 1\n    int32 b\n    int32 c: 1\n    int32 d: 99\n")]
#[case("interface Mixed\n    int32 a: -4\n    int32 b\n")]
fn test_numbering_is_all_or_nothing(#[case] source: &str) {
    let result = validate(&[("m.msg", source)]);
    assert!(!result.success);
    assert_eq!(kinds(&result.errors), vec![ErrorKind::FieldNumberingInconsistent]);
    assert!(result.of_kind(ErrorKind::FieldNumberGap).is_empty());
    assert!(result.of_kind(ErrorKind::DuplicateFieldNumber).is_empty());
}

#[test]
fn test_numbering_findings() {
    let source = "struct N\n    int32 a: 1\n    int32 b: 1\n    int32 c: -2\n    int32 d: 600000000\n";
    let result = validate(&[("n.msg", source)]);
    let mut found = kinds(&result.errors);
    found.sort_by_key(|k| k.as_str());
    assert_eq!(
        found,
        vec![
            ErrorKind::DuplicateFieldNumber,
            ErrorKind::FieldNumberTooLarge,
            ErrorKind::NegativeFieldNumber,
        ]
    );
    assert!(
        result
            .warnings
            .iter()
            .all(|w| w.kind == ErrorKind::FieldNumberGap)
    );
}

#[test]
fn test_gap_warnings_do_not_fail_the_run() {
    let result = validate(&[("g.msg", "struct G\n    int32 a: 1\n    int32 b: 4\n")]);
    assert!(result.success);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("missing 2-3"));

    let quiet = Config {
        validation: ValidationConfig {
            warn_on_number_gaps: false,
            ..ValidationConfig::default()
        },
        ..Config::default()
    };
    let result = validate_with(quiet, &[("g.msg", "struct G\n    int32 a: 1\n    int32 b: 4\n")]);
    assert_eq!(result.summary(), "No errors or warnings");
}

#[test]
fn test_numbering_can_be_required() {
    let config = Config {
        validation: ValidationConfig {
            enforce_field_numbering: true,
            ..ValidationConfig::default()
        },
        ..Config::default()
    };
    let result = validate_with(config, &[("p.msg", POINT)]);
    assert_eq!(kinds(&result.errors), vec![ErrorKind::FieldNumberingRequired]);
}

#[rstest]
#[case("99999999999999999999", ErrorKind::FieldNumberTooLarge)]
#[case("9223372036854775807", ErrorKind::FieldNumberTooLarge)]
#[case("-99999999999999999999", ErrorKind::NegativeFieldNumber)]
fn test_out_of_range_field_numbers_keep_the_field(#[case] number: &str, #[case] expected: ErrorKind) {
    let source = format!("struct S\n    int32 a : {number}\n    int32 b : 1\n");
    let result = validate(&[("s.msg", source.as_str())]);
    assert!(!result.success);
    assert_eq!(kinds(&result.errors), vec![expected]);
    assert_eq!(result.errors[0].line, 2);
    assert!(result.of_kind(ErrorKind::MalformedConstruct).is_empty());
    assert_eq!(result.files.values().next().unwrap().types[0].fields().len(), 2);
}

#[test]
fn test_gap_between_i64_extremes_is_reported() {
    let config = Config {
        validation: ValidationConfig {
            allow_negative_field_numbers: true,
            ..ValidationConfig::default()
        },
        ..Config::default()
    };
    let source = "struct S\n    int32 a : -9223372036854775808\n    int32 b : 9223372036854775807\n";
    let result = validate_with(config, &[("s.msg", source)]);
    assert_eq!(kinds(&result.errors), vec![ErrorKind::FieldNumberTooLarge]);
    assert_eq!(kinds(&result.warnings), vec![ErrorKind::FieldNumberGap]);
}

// =============================================================================
// ENUMS
// =============================================================================

#[test]
fn test_int8_range_single_finding() {
    let result = validate(&[("small.msg", INT8_OVERFLOW)]);
    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
    let finding = &result.errors[0];
    assert_eq!(finding.kind, ErrorKind::EnumValueOutOfRange);
    assert_eq!(finding.line, 3);
    assert!(finding.message.contains("-128"));
    assert!(finding.message.contains("127"));
}

#[test]
fn test_enum_storage_and_duplicates() {
    let result = validate(&[
        ("bad.msg", "enum Bad : float32\n    A\n"),
        ("dup.msg", "enum Dup\n    A = 1\n    B = 1\n    A = 2\n"),
    ]);
    assert_eq!(
        kinds(&result.errors),
        vec![
            ErrorKind::InvalidEnumStorageType,
            ErrorKind::DuplicateEnumValue,
            ErrorKind::DuplicateEnumMemberName,
        ]
    );
}

#[rstest]
#[case("uint8", "111111111111111111111111111111111111111111")]
#[case("int64", "-111111111111111111111111111111111111111111")]
fn test_enum_values_beyond_i128_are_out_of_range(#[case] storage: &str, #[case] value: &str) {
    let source = format!("enum Huge : {storage}\n    OK = 1\n    EDGE = {value}\n");
    let result = validate(&[("huge.msg", source.as_str())]);
    assert!(!result.success);
    assert_eq!(kinds(&result.errors), vec![ErrorKind::EnumValueOutOfRange]);
    assert_eq!(result.errors[0].line, 3);
    assert!(result.of_kind(ErrorKind::MalformedConstruct).is_empty());
}

// =============================================================================
// COLLECTIONS
// =============================================================================

#[rstest]
#[case("array<int32, 0> a", ErrorKind::InvalidCollectionSize)]
#[case("array<int32, max=-1> a", ErrorKind::InvalidCollectionSize)]
#[case("array<int32, 99999999999999999999> a", ErrorKind::InvalidCollectionSize)]
#[case("matrix<float32, 2, 2, 2> m", ErrorKind::InvalidMatrixDimensions)]
#[case("tensor<float32> t", ErrorKind::InvalidTensorDimensions)]
fn test_collection_findings(#[case] field: &str, #[case] kind: ErrorKind) {
    let source = format!("struct C\n    {field}\n");
    let result = validate(&[("c.msg", source.as_str())]);
    assert_eq!(kinds(&result.errors), vec![kind]);
    assert_eq!(result.errors[0].line, 2);
}

// =============================================================================
// NAMES
// =============================================================================

#[test]
fn test_duplicate_field_name() {
    let result = validate(&[("d.msg", "struct D\n    int32 x\n    float32 x\n")]);
    assert_eq!(kinds(&result.errors), vec![ErrorKind::DuplicateFieldName]);
    assert_eq!(result.errors[0].line, 3);
}

#[test]
fn test_naming_conventions_are_warnings() {
    let config = Config {
        naming: NamingConfig {
            enforce_naming_conventions: true,
            ..NamingConfig::default()
        },
        ..Config::default()
    };
    let result = validate_with(
        config,
        &[(
            "n.msg",
            "const int32 lower = 1\nstruct bad_type\n    int32 CamelField\n",
        )],
    );
    assert!(result.success);
    let mut found = kinds(&result.warnings);
    found.sort_by_key(|k| k.as_str());
    assert_eq!(
        found,
        vec![
            ErrorKind::InvalidConstantName,
            ErrorKind::InvalidFieldName,
            ErrorKind::InvalidTypeName,
        ]
    );
    assert!(result.warnings.iter().all(|w| w.severity == Severity::Warning));
}

#[test]
fn test_broken_naming_pattern_disables_checks() {
    let config = Config {
        naming: NamingConfig {
            type_name_pattern: "([A-Z".to_string(),
            enforce_naming_conventions: true,
            ..NamingConfig::default()
        },
        ..Config::default()
    };
    let result = validate_with(config, &[("n.msg", "struct bad_type\n    int32 CamelField\n")]);
    assert!(result.warnings.is_empty());
}
