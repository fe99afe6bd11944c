//! Symbol table behavior across several files.

use lumos::base::PrimitiveType;
use lumos::hir::{ResolvedType, SourceFile, SymbolTable, TypeRef};

use crate::helpers::validation_helpers::extract;

fn table(files: &[SourceFile]) -> SymbolTable {
    let mut table = SymbolTable::new();
    for file in files {
        let registered = table.register_file(file.clone());
        table.register_definitions(&registered);
    }
    table
}

fn field_type(file: &SourceFile, ty: usize, field: usize) -> TypeRef {
    file.types[ty].fields()[field].ty.clone()
}

#[test]
fn test_forward_reference_in_same_file() {
    let file = extract(
        "robot.msg",
        "struct Robot\n    Pose pose\n\nstruct Pose\n    float64 x\n",
    )
    .file;
    let table = table(std::slice::from_ref(&file));
    let resolved = table.resolve_type_ref(&field_type(&file, 0, 0), &file);
    let ResolvedType::User(pose) = resolved else {
        panic!("expected user type, got {resolved:?}");
    };
    assert_eq!(&*pose.qualified_name, "robot::Pose");
}

#[test]
fn test_cross_file_lookup_through_namespace_alias() {
    let geometry = extract("common/geometry.msg", "struct Point\n    float32 x\n").file;
    let robot = extract(
        "robot.msg",
        "namespace geo = common::geometry\n\nstruct R\n    geo::Point p\n    common::geometry::Point q\n",
    )
    .file;
    let table = table(&[geometry, robot.clone()]);

    for index in 0..2 {
        let resolved = table.resolve_type_ref(&field_type(&robot, 0, index), &robot);
        assert!(resolved.is_resolved(), "field {index}: {resolved:?}");
    }
}

#[test]
fn test_alias_and_unresolved_classification() {
    let file = extract(
        "types.msg",
        "using Meters = float64\n\nstruct S\n    Meters distance\n    Unknown thing\n    array<int32> list\n",
    )
    .file;
    let table = table(std::slice::from_ref(&file));

    let ResolvedType::Alias(alias) = table.resolve_type_ref(&field_type(&file, 0, 0), &file) else {
        panic!("expected alias");
    };
    assert_eq!(alias.target, PrimitiveType::Float64);
    assert!(matches!(
        table.resolve_type_ref(&field_type(&file, 0, 1), &file),
        ResolvedType::Unresolved(name) if &*name == "Unknown"
    ));
    assert!(matches!(
        table.resolve_type_ref(&field_type(&file, 0, 2), &file),
        ResolvedType::Collection(_)
    ));
}

#[test]
fn test_statistics_and_namespaces() {
    let a = extract(
        "a/one.msg",
        "const int32 LIMIT = 4\nusing Id = uint64\nstruct A\n    bool b\nenum E\n    X\n",
    )
    .file;
    let b = extract("b/two.msg", "struct B\n    bool b\n").file;
    let table = table(&[a, b]);

    let stats = table.statistics();
    assert_eq!(stats.types, 3);
    assert_eq!(stats.constants, 1);
    assert_eq!(stats.aliases, 1);
    assert_eq!(stats.files, 2);
    assert_eq!(stats.namespaces, 2);

    let namespaces: Vec<String> = table.all_namespaces().iter().map(|n| n.to_string()).collect();
    assert_eq!(namespaces, vec!["a::one", "b::two"]);
    assert_eq!(table.types_in_namespace("a").len(), 2);
}

#[test]
fn test_redefinition_replaces_earlier_entry() {
    let first = extract("dup.msg", "struct D\n    bool a\n").file;
    let second = extract("dup.msg", "struct D\n    bool a\n    bool b\n").file;
    let table = table(&[first, second]);
    assert_eq!(table.get_type("dup::D").unwrap().fields().len(), 2);
    assert_eq!(table.statistics().types, 1);
}
