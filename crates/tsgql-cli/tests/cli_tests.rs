use clap::Parser;
use std::fs;
use std::path::Path;

use tsgql_cli::args::CliArgs;
use tsgql_cli::driver::{Invocation, compile, run};

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("ts2gql").chain(argv.iter().copied()))
        .expect("args")
}

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, text).expect("write");
}

const SCHEMA: &str = "/** @graphql schema */
export interface Schema { query: Query }
export interface Query { greeting: string }
";

#[test]
fn test_compile_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "schema.ts", SCHEMA);
    let output = compile(&dir.path().join("schema.ts"), &[]).expect("compile");
    assert_eq!(
        output,
        "schema {\n  query: Query\n}\n\ntype Query {\n  greeting: String!\n}\n"
    );
}

#[test]
fn test_run_writes_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "schema.ts", SCHEMA);
    run(&args(&["schema.ts", "-o", "out/schema.graphql"]), dir.path()).expect("run");
    let written = fs::read_to_string(dir.path().join("out/schema.graphql")).expect("read");
    assert!(written.starts_with("schema {\n  query: Query\n}"), "{written}");
}

#[test]
fn test_config_file_is_picked_up_from_cwd() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "src/schema.ts",
        "export interface Query { a: string }\nexport interface Extra { b: boolean }",
    );
    write(
        dir.path(),
        "ts2gql.json",
        r#"{ "root": "src/schema.ts", "types": ["Query", "Extra"], "output": "schema.graphql" }"#,
    );
    run(&args(&[]), dir.path()).expect("run");
    let written = fs::read_to_string(dir.path().join("schema.graphql")).expect("read");
    assert_eq!(
        written,
        "type Query {\n  a: String!\n}\n\ntype Extra {\n  b: Boolean!\n}\n"
    );
}

#[test]
fn test_command_line_overrides_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "conf/tsgql.json",
        r#"{ "root": "schema.ts", "types": ["Query"], "output": "schema.graphql" }"#,
    );

    let invocation = Invocation::resolve(
        &args(&["-p", "conf/tsgql.json", "-o", "custom.graphql"]),
        dir.path(),
    )
    .expect("invocation");
    assert_eq!(invocation.root, dir.path().join("conf/schema.ts"));
    assert_eq!(invocation.types, vec!["Query".to_string()]);
    assert_eq!(invocation.output, Some(dir.path().join("custom.graphql")));

    let invocation = Invocation::resolve(
        &args(&["main.ts", "Other", "-p", "conf/tsgql.json"]),
        dir.path(),
    )
    .expect("invocation");
    assert_eq!(invocation.root, dir.path().join("main.ts"));
    assert_eq!(invocation.types, vec!["Other".to_string()]);
    assert_eq!(invocation.output, Some(dir.path().join("conf/schema.graphql")));
}

#[test]
fn test_missing_root_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Invocation::resolve(&args(&[]), dir.path()).expect_err("no root");
    assert!(err.to_string().contains("No root file given"), "{err}");
}

#[test]
fn test_bad_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "ts2gql.json", r#"{ "rootFile": "schema.ts" }"#);
    let err = Invocation::resolve(&args(&["schema.ts"]), dir.path()).expect_err("bad config");
    let message = format!("{err:#}");
    assert!(message.contains("failed to parse config"), "{message}");
    assert!(message.contains("unknown field"), "{message}");
}

#[test]
fn test_nothing_to_emit() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "schema.ts", "export interface Query { a: string }");
    let err = compile(&dir.path().join("schema.ts"), &[]).expect_err("empty graph");
    assert!(err.to_string().contains("Nothing to emit"), "{err}");
}

#[test]
fn test_pipeline_errors_keep_their_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "schema.ts",
        "export interface Query { find(term): string }",
    );
    let err = compile(&dir.path().join("schema.ts"), &["Query".to_string()])
        .expect_err("missing annotation");
    let message = format!("{err:#}");
    assert!(message.contains("Missing type annotation"), "{message}");
    assert!(message.contains("while walking method 'find'"), "{message}");
}
