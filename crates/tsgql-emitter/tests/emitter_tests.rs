use tsgql_binder::Program;
use tsgql_collector::{InterfaceNode, PropertyNode, TypeGraph, TypeId, TypeNode, load};
use tsgql_emitter::emit;

fn graph(source: &str, roots: &[&str]) -> TypeGraph {
    let program = Program::from_sources("/schema.ts", [("/schema.ts", source)]).expect("program");
    let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
    load(&program, &roots).expect("graph")
}

fn emit_ok(source: &str) -> String {
    emit(&graph(source, &["Query"])).expect("emit")
}

fn emit_err(source: &str) -> String {
    format!("{:#}", emit(&graph(source, &["Query"])).expect_err("emit error"))
}

fn register(graph: &mut TypeGraph, name: &str, node: TypeNode) -> TypeId {
    let id = graph.arena.alloc(node);
    graph.types.insert(name.to_string(), id);
    id
}

#[test]
fn test_required_and_optional_properties() {
    assert_eq!(
        emit_ok("export interface Query { name: string; nickname?: string }"),
        "type Query {\n  name: String!\n  nickname: String\n}\n"
    );
}

#[test]
fn test_null_union_is_nullable() {
    assert_eq!(
        emit_ok("export interface Query { a: string | null; b: number | undefined; c: boolean }"),
        "type Query {\n  a: String\n  b: Float\n  c: Boolean!\n}\n"
    );
}

#[test]
fn test_members_are_sorted() {
    assert_eq!(
        emit_ok("export interface Query { zeta: string; alpha: string; mid: string }"),
        "type Query {\n  alpha: String!\n  mid: String!\n  zeta: String!\n}\n"
    );
}

#[test]
fn test_empty_interface_gets_placeholder() {
    assert_eq!(
        emit_ok("export interface Query {}"),
        "type Query {\n  _placeholder: Boolean\n}\n"
    );
}

#[test]
fn test_string_literal_union_is_an_enum() {
    assert_eq!(
        emit_ok("export interface Query { c: Color }\ntype Color = 'red' | 'green' | 'red' | 'blue'"),
        "type Query {\n  c: Color!\n}\n\nenum Color {\n  red\n  green\n  blue\n}\n"
    );
}

#[test]
fn test_interface_union() {
    let output = emit_ok(
        "export interface Query { hero: Character }\ntype Character = Human | Droid\ninterface Human { name: string }\ninterface Droid { model: string }",
    );
    assert!(
        output.contains("\n\nunion Character = Human | Droid\n"),
        "{output}"
    );
    assert!(output.contains("type Human {\n  name: String!\n}"), "{output}");
    assert!(output.contains("type Droid {\n  model: String!\n}"), "{output}");
}

#[test]
fn test_union_with_non_reference_member_fails() {
    let message = emit_err(
        "export interface Query { hero: Character }\ntype Character = Human | boolean\ninterface Human { name: string }",
    );
    assert!(message.contains("must be references"), "{message}");
    assert!(message.contains("boolean"), "{message}");
}

#[test]
fn test_enum_union_merges_values() {
    let output = emit_ok(
        "export interface Query { p: Paint }\ntype Paint = Color | Shade\nenum Color { RED, BLUE }\nenum Shade { DARK, BLUE }",
    );
    assert!(
        output.contains("enum Paint {\n  RED\n  BLUE\n  DARK\n}\n"),
        "{output}"
    );
}

#[test]
fn test_mixed_enum_union_fails() {
    let message = emit_err(
        "export interface Query { p: Paint }\ntype Paint = Color | Human\nenum Color { RED }\ninterface Human { name: string }",
    );
    assert!(message.contains("must be enums"), "{message}");
    assert!(message.contains("'Human' is an interface"), "{message}");
}

#[test]
fn test_scalar_and_nested_unions_fail() {
    let message = emit_err(
        "export interface Query { v: Value }\ntype Value = Name | Human\ntype Name = string\ninterface Human { name: string }",
    );
    assert!(message.contains("unions of scalar types"), "{message}");

    let message = emit_err(
        "export interface Query { v: Value }\ntype Value = Pets | Human\ntype Pets = Cat | Dog\ninterface Cat { a: string }\ninterface Dog { b: string }\ninterface Human { c: string }",
    );
    assert!(message.contains("unions of unions"), "{message}");
}

#[test]
fn test_single_primitive_alias_is_a_scalar() {
    assert_eq!(
        emit_ok("export interface Query { at: Timestamp; maybe: Maybe }\ntype Timestamp = number\ntype Maybe = string | null"),
        "type Query {\n  at: Timestamp!\n  maybe: Maybe!\n}\n\nscalar Timestamp\n\nscalar Maybe\n"
    );
}

#[test]
fn test_scalar_aliases_are_elided() {
    let output = emit_ok(
        "export interface Query { id: UserId; tags: Label[]; name: Name; count: Count; c: Hue }
/** @graphql ID */
type UserId = string;
/** @graphql Int */
type Count = number;
type Name = string;
type Label = Name;
type Hue = Color;
enum Color { RED }",
    );
    assert_eq!(
        output,
        "type Query {\n  c: Color!\n  count: Int!\n  id: ID!\n  name: Name!\n  tags: [Name!]!\n}\n\nscalar Name\n\nenum Color {\n  RED\n}\n"
    );
}

#[test]
fn test_single_inheritance_is_flattened() {
    let output = emit_ok(
        "export interface Query extends Base { b: string; id: number }\ninterface Base extends Root { id: string; a: boolean }\ninterface Root { r: string; a: string }",
    );
    assert_eq!(
        output,
        "type Query {\n  a: Boolean!\n  b: String!\n  id: Float!\n  r: String!\n}\n\ninterface Base {\n  a: Boolean!\n  id: String!\n  r: String!\n}\n\ninterface Root {\n  a: String!\n  r: String!\n}\n"
    );
}

#[test]
fn test_multiple_inheritance_fails() {
    let message = emit_err(
        "export interface Query extends A, B {}\ninterface A { a: string }\ninterface B { b: string }",
    );
    assert!(message.contains("multiple inheritance"), "{message}");
    assert!(message.contains("while emitting 'Query'"), "{message}");
}

#[test]
fn test_input_and_fragment_tags() {
    let output = emit_ok(
        "export interface Query extends Node {
  add(input: NewThing): boolean;
}
/** @graphql input */
interface NewThing { name: string; size?: number }
/** @graphql fragment NodeFields */
interface Node { id: string; kind: string }",
    );
    assert_eq!(
        output,
        "type Query {\n  add(input: NewThing!): Boolean!\n  id: String!\n  kind: String!\n}\n\n\
         interface Node {\n  id: String!\n  kind: String!\n}\n\n\
         fragment NodeFields on Node {\n  id\n  kind\n}\n\n\
         input NewThing {\n  name: String!\n  size: Float\n}\n"
    );
}

#[test]
fn test_methods_render_arguments_and_directives() {
    let output = emit_ok(
        r#"export interface Query {
  /**
   * @graphql Directives
   * @cost (complexity: 3, label: "hi")
   * @deprecated
   */
  find(term: string, limit?: number): string[];
  ping(): boolean;
}"#,
    );
    assert_eq!(
        output,
        "type Query {\n  find(term: String!, limit: Float): [String!]! @cost(complexity: 3, label: \"hi\") @deprecated\n  ping: Boolean!\n}\n"
    );
}

#[test]
fn test_inline_literal_object_fields() {
    assert_eq!(
        emit_ok("export interface Query { point: { y: number; x: number } }"),
        "type Query {\n  point: x: Float!, y: Float!\n}\n"
    );
}

#[test]
fn test_union_in_field_position_fails() {
    let message = emit_err(
        "export interface Query { pet: Cat | Dog }\ninterface Cat { a: string }\ninterface Dog { b: string }",
    );
    assert!(message.contains("Can't serialize union as an expression"), "{message}");
    assert!(message.contains("in field 'pet'"), "{message}");
}

#[test]
fn test_abstract_interface_union_fails() {
    let mut graph = TypeGraph::default();
    register(&mut graph, "Shape", TypeNode::Interface(InterfaceNode::default()));
    let circle = graph.arena.alloc(TypeNode::Reference {
        target: "Shape".to_string(),
    });
    let union = graph.arena.alloc(TypeNode::Union {
        types: vec![circle],
    });
    register(
        &mut graph,
        "AnyShape",
        TypeNode::Alias(tsgql_collector::AliasNode {
            target: union,
            documentation: None,
        }),
    );
    let message = format!("{:#}", emit(&graph).expect_err("abstract member"));
    assert!(message.contains("never used as a concrete type"), "{message}");
}

#[test]
fn test_unknown_top_level_kind_fails() {
    let mut graph = TypeGraph::default();
    let signature = graph.arena.alloc(TypeNode::String);
    register(
        &mut graph,
        "stray",
        TypeNode::Property(PropertyNode {
            name: "stray".to_string(),
            signature,
        }),
    );
    let message = format!("{:#}", emit(&graph).expect_err("property at top level"));
    assert!(
        message.contains("Don't know how to emit property as a top level node"),
        "{message}"
    );
}

#[test]
fn test_empty_graph_emits_nothing() {
    assert_eq!(emit(&TypeGraph::default()).expect("emit"), "");
}
