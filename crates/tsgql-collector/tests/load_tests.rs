use tsgql_binder::Program;
use tsgql_collector::{TypeNode, load};

fn names(roots: &[&str]) -> Vec<String> {
    roots.iter().map(|r| r.to_string()).collect()
}

#[test]
fn test_unknown_root_is_an_error() {
    let program =
        Program::from_sources("/schema.ts", [("/schema.ts", "export interface Query {}\ninterface Hidden {}")])
            .expect("program");
    let err = load(&program, &names(&["Nope"])).expect_err("unknown root");
    assert_eq!(
        err.to_string(),
        "No interface named Nope was exported by /schema.ts"
    );
    let err = load(&program, &names(&["Hidden"])).expect_err("not exported");
    assert!(err.to_string().contains("No interface named Hidden"));
}

#[test]
fn test_schema_tagged_interface_is_a_root() {
    let program = Program::from_sources(
        "/schema.ts",
        [(
            "/schema.ts",
            "/** @graphql schema */\nexport interface Schema { query: Query }\nexport interface Query { greeting: string }",
        )],
    )
    .expect("program");
    let graph = load(&program, &[]).expect("graph");
    let order: Vec<&str> = graph.iter().map(|(name, _)| name).collect();
    assert_eq!(order, vec!["Schema", "Query"]);
}

#[test]
fn test_roots_are_deduplicated_and_concrete() {
    let program = Program::from_sources(
        "/schema.ts",
        [(
            "/schema.ts",
            "/** @graphql schema */\nexport interface Schema { query: Query }\nexport interface Query {}\nexport interface Extra {}",
        )],
    )
    .expect("program");
    let graph = load(&program, &names(&["Schema", "Extra", "Schema"])).expect("graph");
    let order: Vec<&str> = graph.iter().map(|(name, _)| name).collect();
    assert_eq!(order, vec!["Schema", "Query", "Extra"]);
    let Some(TypeNode::Interface(extra)) = graph.get("Extra") else {
        panic!("expected an interface");
    };
    assert!(extra.concrete);
}

#[test]
fn test_reexported_root() {
    let program = Program::from_sources(
        "/index.ts",
        [
            ("/index.ts", "export { Query } from './query';"),
            ("/query.ts", "export interface Query { ok: boolean }"),
        ],
    )
    .expect("program");
    let graph = load(&program, &names(&["Query"])).expect("graph");
    assert!(graph.get("Query").is_some());
}

#[test]
fn test_overrides_apply_after_roots() {
    let program = Program::from_sources(
        "/schema.ts",
        [
            (
                "/schema.ts",
                "import './patches';\nexport interface Query { user: User }\nexport interface User { id: string; name: string }",
            ),
            (
                "/patches.ts",
                "/** @graphql override User */\nexport interface UserPatch { name: number; extra: boolean }",
            ),
        ],
    )
    .expect("program");
    let graph = load(&program, &names(&["Query"])).expect("graph");
    let Some(TypeNode::Interface(user)) = graph.get("User") else {
        panic!("expected an interface");
    };
    let members: Vec<&str> = user
        .members
        .iter()
        .filter_map(|&id| graph.node(id).member_name())
        .collect();
    assert_eq!(members, vec!["id", "extra", "name"]);
    assert!(graph.get("UserPatch").is_none());
}

#[test]
fn test_override_without_name_targets_itself() {
    let program = Program::from_sources(
        "/schema.ts",
        [(
            "/schema.ts",
            "export interface Query { a: string }\n/** @graphql Override */\ninterface Query { a: number }",
        )],
    )
    .expect("program");
    let graph = load(&program, &names(&["Query"])).expect("graph");
    let Some(TypeNode::Interface(query)) = graph.get("Query") else {
        panic!("expected an interface");
    };
    assert_eq!(query.members.len(), 1);
    let TypeNode::Property(property) = graph.node(query.members[0]) else {
        panic!("expected a property");
    };
    assert_eq!(property.name, "a");
    assert!(matches!(
        graph.node(graph.arena.unwrap_not_null(property.signature)),
        TypeNode::Number
    ));
}

#[test]
fn test_override_of_missing_type_fails() {
    let program = Program::from_sources(
        "/schema.ts",
        [(
            "/schema.ts",
            "export interface Query { a: string }\n/** @graphql override Missing */\nexport interface Patch { b: string }",
        )],
    )
    .expect("program");
    let err = load(&program, &names(&["Query"])).expect_err("missing target");
    assert!(err.to_string().contains("'Missing'"), "{err}");
    assert!(err.to_string().contains("never included"), "{err}");
}

#[test]
fn test_same_named_interfaces_from_two_modules_collide() {
    let program = Program::from_sources(
        "/schema.ts",
        [
            (
                "/schema.ts",
                "import { User } from './user';\nimport { User as AdminUser } from './admin';\nexport interface Q { a: User; b: AdminUser }",
            ),
            ("/user.ts", "export interface User { name: string }"),
            ("/admin.ts", "export interface User { permissions: string[] }"),
        ],
    )
    .expect("program");
    let err = load(&program, &names(&["Q"])).expect_err("colliding names");
    let message = format!("{err:#}");
    assert!(
        message.contains("'User' is declared by two unrelated declarations"),
        "{message}"
    );
    assert!(message.contains("/user.ts:1:1"), "{message}");
    assert!(message.contains("/admin.ts:1:1"), "{message}");
}

#[test]
fn test_merged_interface_across_declarations_still_merges() {
    let program = Program::from_sources(
        "/schema.ts",
        [(
            "/schema.ts",
            "export interface Q { name: string }\nexport interface Q { age: number }",
        )],
    )
    .expect("program");
    let graph = load(&program, &names(&["Q"])).expect("graph");
    let Some(TypeNode::Interface(query)) = graph.get("Q") else {
        panic!("expected an interface");
    };
    assert_eq!(query.members.len(), 2);
}
