//! Extraction of the semantic model from parsed sources.

use std::sync::Arc;

use lumos::base::{Position, PrimitiveType};
use lumos::hir::{AttributeValue, Dimension, TypeKind, TypeRef};
use rstest::rstest;

use crate::helpers::source_fixtures::*;
use crate::helpers::validation_helpers::extract;

// =============================================================================
// ROUND TRIP
// =============================================================================

#[test]
fn test_point_round_trip() {
    let extracted = extract("p.msg", POINT);
    assert!(extracted.findings.is_empty());

    let types = &extracted.file.types;
    assert_eq!(types.len(), 1);
    let point = &types[0];
    assert_eq!(&*point.name, "P");
    assert_eq!(point.kind(), TypeKind::Struct);

    let fields = point.fields();
    assert_eq!(fields.len(), 2);
    for (field, name) in fields.iter().zip(["x", "y"]) {
        assert_eq!(&*field.name, name);
        assert_eq!(field.ty, TypeRef::Primitive(PrimitiveType::Float32));
        assert_eq!(field.number, None);
        assert!(!field.optional);
    }
}

// =============================================================================
// ENUMS
// =============================================================================

#[rstest]
#[case("enum E\n    A\n    B\n    C = 100\n    D\n", &[0, 1, 100, 101])]
#[case("enum E\n    A = 5\n    B\n    C = 2\n    D\n", &[5, 6, 2, 3])]
#[case("enum E : int16\n    A = -3\n    B\n    C\n", &[-3, -2, -1])]
fn test_enum_auto_increment(#[case] source: &str, #[case] expected: &[i128]) {
    let extracted = extract("e.msg", source);
    let body = extracted.file.types[0].enum_body().unwrap();
    let values: Vec<i128> = body.members.iter().map(|m| m.value).collect();
    assert_eq!(values, expected);
}

#[test]
fn test_enum_storage_and_attributes() {
    let extracted = extract(
        "e.msg",
        "enum Mode : uint8\n    [attributes]\n        bitflags: false\n    ON\n    OFF\n",
    );
    let mode = &extracted.file.types[0];
    assert_eq!(&*mode.enum_body().unwrap().storage_type, "uint8");
    assert_eq!(mode.attributes["bitflags"], AttributeValue::Bool(false));
    assert_eq!(mode.enum_body().unwrap().members[1].position, Position::new(5, 5));
}

// =============================================================================
// FULL FILE
// =============================================================================

#[test]
fn test_sensor_file() {
    let extracted = extract("sensor.msg", SENSOR);
    assert!(extracted.findings.is_empty(), "{:?}", extracted.findings);
    let file = &extracted.file;

    assert_eq!(&*file.namespace, "sensor");
    assert_eq!(file.imports[0].path, "geometry/point");
    assert_eq!(file.imports[0].position, Position::new(2, 1));
    assert_eq!(&*file.aliases[0].name, "Meters");
    assert_eq!(&*file.constants[0].qualified_name, "sensor::MAX_READINGS");
    assert_eq!(file.constants[0].value, AttributeValue::Integer(128));

    let status = &file.types[0];
    assert_eq!(status.kind(), TypeKind::Enum);
    let values: Vec<i128> = status
        .enum_body()
        .unwrap()
        .members
        .iter()
        .map(|m| m.value)
        .collect();
    assert_eq!(values, vec![0, 1, 10]);

    let reading = &file.types[1];
    assert_eq!(&*reading.qualified_name, "sensor::Reading");
    assert_eq!(reading.attributes["version"], AttributeValue::Integer(2));

    let fields = reading.fields();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[1].ty, TypeRef::Named(Arc::from("Meters")));
    assert_eq!(
        fields[1].inline_attributes["unit"],
        AttributeValue::String("m".into())
    );

    let samples = &fields[3];
    assert!(samples.optional);
    assert_eq!(samples.number, Some(4));
    let TypeRef::Collection(collection) = &samples.ty else {
        panic!("expected collection");
    };
    assert_eq!(collection.dims, vec![Dimension::Max(16)]);
    assert_eq!(
        samples.attributes["description"],
        AttributeValue::String("Raw samples,\n   oldest first".into())
    );
}

#[test]
fn test_interface_fields() {
    let extracted = extract("i.msg", "interface Named\n    string name: 1\n");
    let named = &extracted.file.types[0];
    assert_eq!(named.kind(), TypeKind::Interface);
    assert_eq!(named.fields()[0].number, Some(1));
}
