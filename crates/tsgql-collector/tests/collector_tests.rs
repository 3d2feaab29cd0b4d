use tsgql_binder::{NodeRef, Program, TypeChecker};
use tsgql_collector::{Collector, TypeGraph, TypeId, TypeNode, load};

fn program(source: &str) -> Program {
    Program::from_sources("/schema.ts", [("/schema.ts", source)]).expect("program")
}

fn collect(source: &str, roots: &[&str]) -> TypeGraph {
    let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
    load(&program(source), &roots).expect("graph")
}

fn collect_err(source: &str, roots: &[&str]) -> String {
    let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
    format!("{:#}", load(&program(source), &roots).expect_err("error"))
}

fn exported_declaration(program: &Program, name: &str) -> NodeRef {
    let symbol = program
        .find_exported(program.root_file(), name)
        .expect("lookup")
        .expect("exported");
    let symbol = program.get_aliased_symbol(symbol).expect("aliased");
    program.get_declarations(symbol)[0]
}

fn interface<'g>(graph: &'g TypeGraph, name: &str) -> &'g tsgql_collector::InterfaceNode {
    match graph.get(name) {
        Some(TypeNode::Interface(interface)) => interface,
        other => panic!("{name} is not an interface: {other:?}"),
    }
}

/// `(name, signature)` of each property of an interface.
fn properties(graph: &TypeGraph, name: &str) -> Vec<(String, TypeId)> {
    interface(graph, name)
        .members
        .iter()
        .filter_map(|&id| match graph.node(id) {
            TypeNode::Property(property) => Some((property.name.clone(), property.signature)),
            _ => None,
        })
        .collect()
}

fn signature<'g>(graph: &'g TypeGraph, interface_name: &str, property: &str) -> &'g TypeNode {
    let (_, id) = properties(graph, interface_name)
        .into_iter()
        .find(|(name, _)| name == property)
        .expect("property");
    graph.node(id)
}

fn not_null_inner<'g>(graph: &'g TypeGraph, node: &TypeNode) -> &'g TypeNode {
    match node {
        TypeNode::NotNull { node } => graph.node(*node),
        other => panic!("expected NotNull, got {other:?}"),
    }
}

#[test]
fn test_self_reference_terminates_with_one_entry() {
    let graph = collect("export interface Node { next: Node; children: Node[] }", &["Node"]);
    assert_eq!(graph.len(), 1);
    assert_eq!(interface(&graph, "Node").members.len(), 2);

    let next = not_null_inner(&graph, signature(&graph, "Node", "next"));
    assert_eq!(next, &TypeNode::Reference { target: "Node".to_string() });
}

#[test]
fn test_walk_is_memoized_by_declaration() {
    let program = program("export interface A { b: B }\ninterface B { a: A }");
    let declaration = exported_declaration(&program, "A");
    let mut collector = Collector::new(&program);
    let first = collector.add_root_node(declaration).expect("first");
    let second = collector.walk(declaration).expect("second").expect("node");
    assert_eq!(first, second);
    assert_eq!(collector.graph().len(), 2);
}

#[test]
fn test_graph_is_in_pre_order() {
    let graph = collect(
        "export interface Query { user: User }\ninterface User { address: Address }\ninterface Address { city: string }",
        &["Query"],
    );
    let names: Vec<&str> = graph.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Query", "User", "Address"]);
}

#[test]
fn test_concrete_tracks_value_references() {
    let graph = collect(
        "export interface Query { b: B }\ninterface B extends A { x: string }\ninterface A { y: string }",
        &["Query"],
    );
    assert!(interface(&graph, "Query").concrete);
    assert!(interface(&graph, "B").concrete);
    assert!(!interface(&graph, "A").concrete);
    assert_eq!(interface(&graph, "B").inherits, vec!["A".to_string()]);
}

#[test]
fn test_optional_property_is_nullable() {
    let graph = collect("export interface Q { required: string; optional?: string }", &["Q"]);
    let required = not_null_inner(&graph, signature(&graph, "Q", "required"));
    assert_eq!(required, &TypeNode::String);
    assert_eq!(signature(&graph, "Q", "optional"), &TypeNode::String);
}

#[test]
fn test_null_union_members_are_dropped() {
    let graph = collect(
        "export interface Q { maybe: Other | null; either: string | undefined }\ninterface Other {}",
        &["Q"],
    );
    let TypeNode::Union { types } = signature(&graph, "Q", "maybe") else {
        panic!("expected a union");
    };
    assert_eq!(types.len(), 1);
    assert_eq!(
        graph.node(types[0]),
        &TypeNode::Reference { target: "Other".to_string() }
    );

    let TypeNode::Union { types } = signature(&graph, "Q", "either") else {
        panic!("expected a union");
    };
    assert_eq!(graph.node(types[0]), &TypeNode::String);
}

#[test]
fn test_enum_values() {
    let graph = collect(
        "export interface Q { c: Color }\nenum Color { RED = 'RED', BLUE, SEVEN = 7, NEG = -1, CAST = <any>'cast', AS = 'as' as any }",
        &["Q"],
    );
    let Some(TypeNode::Enum(color)) = graph.get("Color") else {
        panic!("expected an enum");
    };
    assert_eq!(color.values, vec!["RED", "BLUE", "SEVEN", "NEG", "cast", "as"]);
}

#[test]
fn test_enum_values_keep_inner_whitespace_and_take_last_operand() {
    let graph = collect(
        "export interface Q { f: Flags }\nenum Flags { PAD = ' padded ', SHIFT = 1 << 2, BOTH = READ | WRITE }",
        &["Q"],
    );
    let Some(TypeNode::Enum(flags)) = graph.get("Flags") else {
        panic!("expected an enum");
    };
    assert_eq!(flags.values, vec![" padded ", "2", "WRITE"]);
}

#[test]
fn test_type_alias_wraps_target() {
    let graph = collect("export interface Q { id: Id }\ntype Id = string;", &["Q"]);
    let Some(TypeNode::Alias(alias)) = graph.get("Id") else {
        panic!("expected an alias");
    };
    assert_eq!(not_null_inner(&graph, graph.node(alias.target)), &TypeNode::String);
}

#[test]
fn test_arrays_and_lib_array() {
    let graph = collect(
        "export interface Q { a: string[]; b: Array<number>; c: ReadonlyArray<boolean>; d: (string)[] }",
        &["Q"],
    );
    for (property, leaf) in [
        ("a", TypeNode::String),
        ("b", TypeNode::Number),
        ("c", TypeNode::Boolean),
        ("d", TypeNode::String),
    ] {
        let TypeNode::Array { elements } = not_null_inner(&graph, signature(&graph, "Q", property))
        else {
            panic!("{property} is not an array");
        };
        assert_eq!(not_null_inner(&graph, graph.node(elements[0])), &leaf, "{property}");
    }
}

#[test]
fn test_date_is_a_builtin_scalar() {
    let graph = collect("export interface Q { at: Date }", &["Q"]);
    assert!(matches!(graph.get("Date"), Some(TypeNode::Alias(_))));
    let at = not_null_inner(&graph, signature(&graph, "Q", "at"));
    assert_eq!(at, &TypeNode::Reference { target: "Date".to_string() });
}

#[test]
fn test_namespace_members_are_qualified() {
    let graph = collect(
        "export namespace Api { export interface User { name: string } }\nexport interface Query { user: Api.User }",
        &["Query"],
    );
    assert!(graph.get("Api.User").is_some());
    let user = not_null_inner(&graph, signature(&graph, "Query", "user"));
    assert_eq!(user, &TypeNode::Reference { target: "Api.User".to_string() });
}

#[test]
fn test_imported_reference_uses_target_name() {
    let program = Program::from_sources(
        "/schema.ts",
        [
            ("/schema.ts", "import { User as Person } from './user';\nexport interface Query { me: Person }"),
            ("/user.ts", "export interface User { name: string }"),
        ],
    )
    .expect("program");
    let graph = load(&program, &["Query".to_string()]).expect("graph");
    assert!(graph.get("User").is_some());
    assert!(graph.get("Person").is_none());
}

#[test]
fn test_method_parameters_and_directives() {
    let graph = collect(
        r#"export interface Query {
  /**
   * Find things.
   * @graphql Directives
   * @cost (complexity: 3, label: "hi")
   * @deprecated
   */
  find(term: string, limit?: number): Thing[];
  ping(): boolean;
}
interface Thing { id: string }"#,
        &["Query"],
    );
    let methods: Vec<&tsgql_collector::MethodNode> = interface(&graph, "Query")
        .members
        .iter()
        .filter_map(|&id| match graph.node(id) {
            TypeNode::Method(method) => Some(method),
            _ => None,
        })
        .collect();
    assert_eq!(methods.len(), 2);

    let find = methods[0];
    assert_eq!(find.name, "find");
    let params: Vec<&str> = find.parameters.keys().map(String::as_str).collect();
    assert_eq!(params, vec!["term", "limit"]);
    assert_eq!(graph.node(find.parameters["limit"]), &TypeNode::Number);
    assert_eq!(find.directives.len(), 2);
    assert_eq!(find.directives[0].name, "cost");
    assert_eq!(find.directives[0].params["complexity"].text, "3");
    assert_eq!(find.directives[0].params["label"].text, r#""hi""#);
    assert_eq!(find.directives[1].name, "deprecated");
    assert!(find.directives[1].params.is_empty());

    assert!(methods[1].parameters.is_empty());
    assert!(methods[1].directives.is_empty());
}

#[test]
fn test_duplicate_directive_is_an_error() {
    let message = collect_err(
        "export interface Q {\n  /**\n   * @graphql Directives\n   * @auth\n   * @auth\n   */\n  m(): string;\n}",
        &["Q"],
    );
    assert!(message.contains("@auth is declared more than once"), "{message}");
    assert!(message.contains("while walking method 'm'"), "{message}");
}

#[test]
fn test_errors_carry_breadcrumbs() {
    let message = collect_err("export interface Q { m(a: Missing): string }", &["Q"]);
    assert!(message.contains("while walking interface 'Q'"), "{message}");
    assert!(message.contains("while walking method 'm'"), "{message}");
    assert!(message.contains("Cannot find name 'Missing'"), "{message}");
}

#[test]
fn test_type_parameter_is_rejected() {
    let message = collect_err("export interface Box<T> { value: T }", &["Box"]);
    assert!(message.contains("Type parameter 'T'"), "{message}");
    assert!(message.contains("while walking property 'value'"), "{message}");
}

#[test]
fn test_unsupported_construct_names_kind_and_file() {
    let message = collect_err("export interface Q { f: () => void }", &["Q"]);
    assert!(message.contains("Don't know how to handle FunctionType nodes"), "{message}");
    assert!(message.contains("/schema.ts:1:"), "{message}");

    let message = collect_err("class C {}\nexport interface Q { c: C }", &["Q"]);
    assert!(message.contains("ClassDeclaration"), "{message}");
}

#[test]
fn test_namespace_merged_with_enum_is_ignored() {
    let graph = collect(
        "export interface Q { e: E }\nenum E { A }\nnamespace E { export const x = 1; }",
        &["Q"],
    );
    assert!(matches!(graph.get("E"), Some(TypeNode::Enum(_))));
}

#[test]
fn test_merge_overrides_replaces_members() {
    let program = program(
        "export interface Base { a: string; b: string }\nexport interface Patch { b: number; c: boolean }",
    );
    let mut collector = Collector::new(&program);
    collector
        .add_root_node(exported_declaration(&program, "Base"))
        .expect("base");
    collector
        .merge_overrides(exported_declaration(&program, "Patch"), "Base")
        .expect("merge");

    let graph = collector.into_graph();
    let names: Vec<String> = properties(&graph, "Base")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["a", "c", "b"]);
    let b = not_null_inner(&graph, signature(&graph, "Base", "b"));
    assert_eq!(b, &TypeNode::Number);
    assert!(graph.get("Patch").is_none());
}

#[test]
fn test_override_of_unknown_type_fails() {
    let program = program("export interface Patch { b: number }");
    let mut collector = Collector::new(&program);
    let err = collector
        .merge_overrides(exported_declaration(&program, "Patch"), "Base")
        .expect_err("never included");
    assert!(err.to_string().contains("never included"), "{err}");
}
