use tsgql_binder::Program;
use tsgql_collector::load;
use tsgql_emitter::emit;

fn schema_for(files: &[(&str, &str)], roots: &[&str]) -> String {
    let program = Program::from_sources(files[0].0, files.iter().copied()).expect("program");
    let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
    let graph = load(&program, &roots).expect("graph");
    emit(&graph).expect("emit")
}

fn schema(source: &str, roots: &[&str]) -> String {
    schema_for(&[("/schema.ts", source)], roots)
}

#[test]
fn test_schema_root_and_query() {
    let output = schema(
        "/** @graphql schema */\nexport interface Schema { query: Query }\nexport interface Query { greeting: string }",
        &[],
    );
    assert_eq!(
        output,
        "schema {\n  query: Query\n}\n\ntype Query {\n  greeting: String!\n}\n"
    );
}

#[test]
fn test_query_and_mutation_roots() {
    let output = schema(
        r#"/** @graphql schema */
export interface Schema {
  query: Query;
  mutation?: Mutation;
}

export interface Query {
  user(id: UserId): User;
  users(first?: number): User[];
}

export interface Mutation {
  rename(id: UserId, name: string): User;
}

/** @graphql ID */
type UserId = string;

interface User {
  id: UserId;
  name: string;
  email?: string;
  createdAt: Date;
}
"#,
        &[],
    );
    assert_eq!(
        output,
        r#"schema {
  mutation: Mutation
  query: Query
}

type Query {
  user(id: ID!): User!
  users(first: Float): [User!]!
}

type User {
  createdAt: Date!
  email: String
  id: ID!
  name: String!
}

scalar Date

type Mutation {
  rename(id: ID!, name: String!): User!
}
"#
    );
}

#[test]
fn test_named_roots_across_modules() {
    let output = schema_for(
        &[
            (
                "/index.ts",
                "import { Post } from './post';\nexport interface Query { posts: Post[] }",
            ),
            (
                "/post.ts",
                "export interface Post { title: string; tags?: string[]; status: Status }\nexport enum Status { DRAFT = 'DRAFT', PUBLISHED = 'PUBLISHED' }",
            ),
        ],
        &["Query"],
    );
    assert_eq!(
        output,
        r#"type Query {
  posts: [Post!]!
}

type Post {
  status: Status!
  tags: [String!]
  title: String!
}

enum Status {
  DRAFT
  PUBLISHED
}
"#
    );
}

#[test]
fn test_override_replaces_field_type() {
    let output = schema_for(
        &[
            (
                "/schema.ts",
                "import './overrides';\nexport interface Query { item: Item }\nexport interface Item { id: string; legacy: string }",
            ),
            (
                "/overrides.ts",
                "/** @graphql override Item */\nexport interface ItemOverride { legacy: number; extra: boolean }",
            ),
        ],
        &["Query"],
    );
    assert_eq!(
        output,
        "type Query {\n  item: Item!\n}\n\ntype Item {\n  extra: Boolean!\n  id: String!\n  legacy: Float!\n}\n"
    );
}

#[test]
fn test_namespaced_names_are_sanitized() {
    let output = schema(
        "export interface Query { me: Api.User }\nexport namespace Api { export interface User { id: string } }",
        &["Query"],
    );
    assert_eq!(
        output,
        "type Query {\n  me: Api_User!\n}\n\ntype Api_User {\n  id: String!\n}\n"
    );
}

#[test]
fn test_non_ascii_names_are_sanitized() {
    let output = schema("export interface Café { naïve: string }", &["Café"]);
    assert_eq!(output, "type Caf_ {\n  na_ve: String!\n}\n");
}

#[test]
fn test_errors_name_the_declaration() {
    let program = Program::from_sources(
        "/schema.ts",
        [(
            "/schema.ts",
            "export interface Query { pet: Pet }\ntype Pet = Cat | boolean\ninterface Cat { name: string }",
        )],
    )
    .expect("program");
    let graph = load(&program, &["Query".to_string()]).expect("graph");
    let message = format!("{:#}", emit(&graph).expect_err("boolean union member"));
    assert!(message.contains("while emitting 'Pet'"), "{message}");
    assert!(message.contains("boolean"), "{message}");
}
