//! Tests for type and type member parsing.

use tsgql_parser::{NodeArena, NodeData, NodeIndex, ParserState};
use tsgql_scanner::SyntaxKind;

/// Parse `type T = <source>;` and return the arena and the aliased type node.
fn parse_type(source: &str) -> (NodeArena, NodeIndex) {
    let text = format!("type T = {source};");
    let mut parser = ParserState::new("types.ts".to_string(), text);
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parser.get_diagnostics()
    );
    let parsed = parser.into_parsed_file(root);
    let Some(NodeData::SourceFile(file)) = parsed.arena.get_data(root) else {
        panic!("expected source file");
    };
    let Some(NodeData::TypeAliasDeclaration(alias)) = parsed.arena.get_data(file.statements.nodes[0])
    else {
        panic!("expected alias");
    };
    let type_node = alias.type_node;
    (parsed.arena, type_node)
}

#[test]
fn test_keyword_types() {
    for (source, kind) in [
        ("string", SyntaxKind::StringKeyword),
        ("number", SyntaxKind::NumberKeyword),
        ("boolean", SyntaxKind::BooleanKeyword),
        ("null", SyntaxKind::NullKeyword),
        ("undefined", SyntaxKind::UndefinedKeyword),
        ("void", SyntaxKind::VoidKeyword),
        ("any", SyntaxKind::AnyKeyword),
    ] {
        let (arena, ty) = parse_type(source);
        assert!(
            matches!(arena.get_data(ty), Some(NodeData::KeywordType(k)) if *k == kind),
            "{source}"
        );
    }
}

#[test]
fn test_nested_arrays_and_generics() {
    let (arena, ty) = parse_type("Array<Map<string, User[]>>[]");
    let Some(NodeData::ArrayType(outer)) = arena.get_data(ty) else {
        panic!("expected array");
    };
    let Some(NodeData::TypeReference(array)) = arena.get_data(outer.element_type) else {
        panic!("expected reference");
    };
    assert_eq!(arena.get_identifier_text(array.type_name), Some("Array"));
    assert_eq!(array.type_arguments.len(), 1);
    let Some(NodeData::TypeReference(map)) = arena.get_data(array.type_arguments.nodes[0]) else {
        panic!("expected map reference");
    };
    assert_eq!(map.type_arguments.len(), 2);
}

#[test]
fn test_union_of_literals_and_null() {
    let (arena, ty) = parse_type("'a' | \"b\" | -1 | null");
    let Some(NodeData::UnionType(union)) = arena.get_data(ty) else {
        panic!("expected union");
    };
    assert_eq!(union.types.len(), 4);
    let Some(NodeData::LiteralType(first)) = arena.get_data(union.types.nodes[0]) else {
        panic!("expected literal type");
    };
    assert!(matches!(
        arena.get_data(first.literal),
        Some(NodeData::StringLiteral(lit)) if lit.text == "a"
    ));
    let Some(NodeData::LiteralType(negative)) = arena.get_data(union.types.nodes[2]) else {
        panic!("expected literal type");
    };
    assert!(matches!(
        arena.get_data(negative.literal),
        Some(NodeData::PrefixUnaryExpression(_))
    ));
}

#[test]
fn test_intersection_binds_tighter_than_union() {
    let (arena, ty) = parse_type("A & B | C");
    let Some(NodeData::UnionType(union)) = arena.get_data(ty) else {
        panic!("expected union");
    };
    assert!(matches!(
        arena.get_data(union.types.nodes[0]),
        Some(NodeData::IntersectionType(inter)) if inter.types.len() == 2
    ));
}

#[test]
fn test_function_and_parenthesized_types() {
    let (arena, ty) = parse_type("(a: string, b?: number) => void");
    assert!(matches!(
        arena.get_data(ty),
        Some(NodeData::FunctionType(f)) if f.parameters.len() == 2 && !f.is_constructor
    ));

    let (arena, ty) = parse_type("(string | number)[]");
    let Some(NodeData::ArrayType(array)) = arena.get_data(ty) else {
        panic!("expected array");
    };
    assert!(matches!(
        arena.get_data(array.element_type),
        Some(NodeData::ParenthesizedType(_))
    ));
}

#[test]
fn test_type_literal_members() {
    let (arena, ty) = parse_type(
        "{ readonly id: string, [key: string]: any; (x: number): string; new (): T; get?(): T }",
    );
    let Some(NodeData::TypeLiteral(literal)) = arena.get_data(ty) else {
        panic!("expected type literal");
    };
    let kinds: Vec<&str> = literal
        .members
        .iter()
        .filter_map(|m| arena.get_data(m).map(NodeData::kind_name))
        .collect();
    assert_eq!(
        kinds,
        vec![
            "PropertySignature",
            "IndexSignature",
            "CallSignature",
            "ConstructSignature",
            "MethodSignature",
        ]
    );
    let Some(NodeData::MethodSignature(get)) = arena.get_data(literal.members.nodes[4]) else {
        panic!("expected method");
    };
    assert!(get.question_token);
}

#[test]
fn test_qualified_reference_and_tuple() {
    let (arena, ty) = parse_type("[Outer.Inner, ...string[]]");
    let Some(NodeData::TupleType(tuple)) = arena.get_data(ty) else {
        panic!("expected tuple");
    };
    assert_eq!(tuple.elements.len(), 2);
    let Some(NodeData::TypeReference(reference)) = arena.get_data(tuple.elements.nodes[0]) else {
        panic!("expected reference");
    };
    assert_eq!(
        arena.get_entity_name_text(reference.type_name).as_deref(),
        Some("Outer.Inner")
    );
}

#[test]
fn test_type_operators_and_queries() {
    let (arena, ty) = parse_type("keyof typeof config");
    let Some(NodeData::TypeOperator(op)) = arena.get_data(ty) else {
        panic!("expected type operator");
    };
    assert_eq!(op.operator, SyntaxKind::KeyOfKeyword);
    assert!(matches!(
        arena.get_data(op.type_node),
        Some(NodeData::TypeQuery(_))
    ));
}

#[test]
fn test_missing_type_reports_diagnostic() {
    let mut parser = ParserState::new("bad.ts".to_string(), "type T = ;".to_string());
    parser.parse_source_file();
    assert_eq!(parser.get_diagnostics().len(), 1);
    assert_eq!(parser.get_diagnostics()[0].message_text, "Type expected.");
}
