//! Attribute schema checks through the validation pipeline.

use lumos::config::AttributeConfig;
use lumos::validate::attributes::{AttributeSchema, SchemaError};
use lumos::{Config, ErrorKind, SchemaRegistry, Severity};
use rstest::rstest;

use crate::helpers::source_fixtures::*;
use crate::helpers::validation_helpers::*;

fn units_config() -> Config {
    Config {
        attributes: AttributeConfig {
            enabled_schemas: vec!["units".to_string()],
            ..AttributeConfig::default()
        },
        ..Config::default()
    }
}

fn units_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.load_yaml_str(UNITS_SCHEMA).unwrap();
    registry
}

fn run(config: Config, source: &str) -> lumos::ValidationResult {
    validate_with_registry(config, units_registry(), &[("s.msg", source)])
}

#[test]
fn test_valid_attributes() {
    let source = "struct S\n    [attributes]\n        version: 3\n    float32 d @unit(\"m\")\n        range:\n            min: 0\n            max: 2.5\n";
    let result = run(units_config(), source);
    assert_eq!(result.summary(), "No errors or warnings");
}

#[test]
fn test_unknown_attribute_is_warning_only() {
    let result = run(units_config(), "struct S\n    float32 d @color(\"red\")\n");
    assert!(result.success);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    let warning = &result.warnings[0];
    assert_eq!(warning.kind, ErrorKind::UnknownAttribute);
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(
        &*warning.message,
        "Unknown attribute 'color' (not in enabled schemas: units)"
    );
}

#[test]
fn test_strict_mode_makes_unknown_an_error() {
    let mut config = units_config();
    config.attributes.strict_mode = true;
    let result = run(config, "struct S\n    float32 d @color(\"red\")\n");
    assert!(!result.success);
    assert_eq!(kinds(&result.errors), vec![ErrorKind::UnknownAttribute]);
}

#[rstest]
#[case("float32 d @unit(\"ft\")", "Value 'ft' not in allowed values")]
#[case("float32 d @unit(3)", "Expected type string, got integer")]
#[case("float32 d\n        range:\n            min: 1", "Required property 'max' missing")]
#[case("float32 d\n        range:\n            min: 1\n            max: \"x\"", "Property 'max': Expected type number, got string")]
fn test_invalid_field_attributes(#[case] field: &str, #[case] reason: &str) {
    let source = format!("struct S\n    {field}\n");
    let result = run(units_config(), &source);
    assert_eq!(kinds(&result.errors), vec![ErrorKind::InvalidAttribute]);
    let message = &result.errors[0].message;
    assert!(message.starts_with("Invalid attribute '"), "{message}");
    assert!(message.contains("(schema 'units')"), "{message}");
    assert!(message.contains(reason), "{message}");
    assert_eq!(result.errors[0].line, 2);
}

#[test]
fn test_struct_attribute_constraint() {
    let result = run(
        units_config(),
        "struct S\n    [attributes]\n        version: 0\n    bool b\n",
    );
    assert_eq!(kinds(&result.errors), vec![ErrorKind::InvalidAttribute]);
    assert!(result.errors[0].message.contains("Value 0 is less than minimum 1"));
    assert_eq!(result.errors[0].line, 1);
}

#[test]
fn test_no_enabled_schema_skips_attribute_checks() {
    let result = run(Config::default(), "struct S\n    float32 d @color(\"red\")\n");
    assert_eq!(result.summary(), "No errors or warnings");
}

#[test]
fn test_schema_documents_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_tree(
        dir.path(),
        &[
            ("units.yaml", UNITS_SCHEMA),
            ("broken.yaml", "schema_name: broken\nfield_attributes:\n  x:\n    type: decimal\n"),
        ],
    );

    let schema = AttributeSchema::from_path(&paths[0]).unwrap();
    assert_eq!(schema.schema_name, "units");
    assert!(schema.field_attributes.contains_key("range"));

    assert!(matches!(
        AttributeSchema::from_path(&paths[1]),
        Err(SchemaError::Yaml(_))
    ));

    let config = AttributeConfig {
        custom_schemas: vec![paths[0].clone()],
        ..AttributeConfig::default()
    };
    let registry = SchemaRegistry::from_config(&config).unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["units"]);
}

#[test]
fn test_custom_schemas_are_loaded_by_the_validator() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_tree(
        dir.path(),
        &[
            ("units.yaml", UNITS_SCHEMA),
            ("broken.yaml", "schema_name: broken\nfield_attributes:\n  x:\n    type: decimal\n"),
        ],
    );
    let mut config = units_config();
    config.attributes.custom_schemas = paths;

    let source = "struct S\n    float32 d @unit(\"m\")\n    float32 e @color(\"red\")\n";
    let result = validate_with(config, &[("s.msg", source)]);
    assert!(result.success);
    assert_eq!(kinds(&result.warnings), vec![ErrorKind::UnknownAttribute]);
    assert!(result.warnings[0].message.contains("'color'"));
}
