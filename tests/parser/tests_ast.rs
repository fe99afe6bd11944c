//! Typed AST access through the full `MsgParser` pipeline.

use lumos::base::{CollectionKind, Position, PrimitiveType};
use lumos::parser::{
    AstNode, DimensionValue, Item, MsgParser, ParseFailure, SourceFile, SourceParser, TypeExpr,
};

use crate::helpers::source_fixtures::*;

fn root(source: &str) -> (SourceFile, lumos::parser::ParsedSource) {
    let parsed = MsgParser::default().parse(source).unwrap();
    let root = SourceFile::cast(parsed.syntax()).unwrap();
    (root, parsed)
}

#[test]
fn test_point_parses_to_one_struct() {
    let (root, _) = root(POINT);
    let items: Vec<_> = root.items().collect();
    assert_eq!(items.len(), 1);
    let Item::Struct(def) = &items[0] else {
        panic!("expected Struct");
    };
    assert_eq!(def.name().unwrap().text().as_deref(), Some("P"));
    let fields: Vec<_> = def.body().unwrap().fields().collect();
    assert_eq!(fields.len(), 2);
    for field in &fields {
        assert!(field.number().is_none());
        let Some(TypeExpr::Primitive(ty)) = field.ty() else {
            panic!("expected primitive");
        };
        assert_eq!(ty.primitive(), Some(PrimitiveType::Float32));
    }
}

#[test]
fn test_sensor_items_in_order() {
    let (root, _) = root(SENSOR);
    let kinds: Vec<&str> = root
        .items()
        .map(|item| match item {
            Item::Import(_) => "import",
            Item::UsingNamespace(_) => "using_namespace",
            Item::NamespaceAlias(_) => "namespace_alias",
            Item::UsingAlias(_) => "using_alias",
            Item::Const(_) => "const",
            Item::Struct(_) => "struct",
            Item::Interface(_) => "interface",
            Item::Enum(_) => "enum",
        })
        .collect();
    assert_eq!(kinds, vec!["import", "using_alias", "const", "enum", "struct"]);
}

#[test]
fn test_node_positions_are_source_positions() {
    let (root, parsed) = root(SENSOR);
    let collection = root.collection_types().next().unwrap();
    assert_eq!(collection.kind(), Some(CollectionKind::Array));
    assert_eq!(
        collection.dimensions().map(|d| d.value()).collect::<Vec<_>>(),
        vec![Some(DimensionValue::Max(16))]
    );
    assert_eq!(
        parsed.node_position(collection.syntax()),
        Position::new(18, 14)
    );
}

#[test]
fn test_syntax_errors_are_reported_with_source_lines() {
    let err = MsgParser::default()
        .parse("struct P\n    float32 x\n    float32\n")
        .unwrap_err();
    let ParseFailure::Syntax(errors) = err else {
        panic!("expected syntax errors");
    };
    assert!(!errors.is_empty());
    assert_eq!(errors[0].position.line, 3);
}

#[test]
fn test_parse_lenient_keeps_tree() {
    let parsed = MsgParser::default()
        .parse_lenient("struct P\n    float32 = 1\n    bool ok\n")
        .unwrap();
    assert!(!parsed.ok());
    let root = SourceFile::cast(parsed.syntax()).unwrap();
    assert_eq!(root.items().count(), 1);
}
