use tsgql_collector::directives::{TokenKind, parse_directive_arguments, tokenize};

fn error(input: &str) -> String {
    format!(
        "{:#}",
        parse_directive_arguments(input).expect_err("expected an error")
    )
}

#[test]
fn test_arguments_keep_order_and_raw_text() {
    let args = parse_directive_arguments(r#"(count: 3, label: "hi")"#).expect("arguments");
    let entries: Vec<(&str, &str)> = args
        .iter()
        .map(|(name, value)| (name.as_str(), value.text.as_str()))
        .collect();
    assert_eq!(entries, vec![("count", "3"), ("label", r#""hi""#)]);
}

#[test]
fn test_empty_text_means_no_arguments() {
    assert!(parse_directive_arguments("").expect("empty").is_empty());
    assert!(parse_directive_arguments("   ").expect("blank").is_empty());
    assert!(parse_directive_arguments("()").expect("empty list").is_empty());
}

#[test]
fn test_bare_names_and_single_quotes() {
    let args = parse_directive_arguments("(reason: 'gone', level: HIGH, flag: true)").expect("arguments");
    assert_eq!(args["reason"].text, "'gone'");
    assert_eq!(args["level"].text, "HIGH");
    assert_eq!(args["flag"].text, "true");
}

#[test]
fn test_duplicate_argument_is_named() {
    let message = error("(count: 3, count: 4)");
    assert!(message.contains("Duplicate"), "{message}");
    assert!(message.contains("count"), "{message}");
}

#[test]
fn test_missing_open_paren() {
    assert!(error("count: 3)").contains("'('"));
}

#[test]
fn test_missing_close_paren() {
    assert!(error("(count: 3").contains("expected ')'"));
    assert!(error("(").contains("expected ')'"));
}

#[test]
fn test_missing_comma() {
    assert!(error("(a: 1 b: 2)").contains("Expected ','"));
}

#[test]
fn test_missing_colon() {
    assert!(error("(a 1)").contains("Expected ':'"));
}

#[test]
fn test_missing_or_invalid_value() {
    assert!(error("(a: )").contains("Missing value"));
    assert!(error("(a: 3x)").contains("Invalid value '3x'"));
    assert!(error("(a: b.c)").contains("Invalid value 'b.c'"));
}

#[test]
fn test_unterminated_string() {
    assert!(error(r#"(a: "open)"#).contains("Unterminated string literal"));
}

#[test]
fn test_multiline_string() {
    assert!(error("(a: \"one\ntwo\")").contains("cannot span lines"));
}

#[test]
fn test_trailing_garbage() {
    assert!(error("(a: 1) extra").contains("Unexpected text after directive parameters"));
}

#[test]
fn test_trailing_comma_is_rejected_by_parser() {
    let tokens = tokenize("(a: 1,)").expect("tokens");
    assert_eq!(tokens[tokens.len() - 2].kind, TokenKind::Separator);
    assert!(error("(a: 1,)").contains("after ','"));
}
