//! Tests for structured JSDoc parsing.

use tsgql_common::{JsDocTag, parse_jsdoc};

#[test]
fn description_precedes_tags() {
    let doc = parse_jsdoc("A user of the system.\nSecond line.\n@graphql schema");
    assert_eq!(doc.description, "A user of the system.\nSecond line.");
    assert_eq!(doc.tags, vec![JsDocTag::new("graphql", Some("schema".to_string()))]);
}

#[test]
fn tags_without_text_have_no_description() {
    let doc = parse_jsdoc("@graphql Directives\n@deprecated\n@cost (complexity: 5)");
    assert_eq!(doc.tags.len(), 3);
    assert_eq!(doc.tags[0].description.as_deref(), Some("Directives"));
    assert_eq!(doc.tags[1].title, "deprecated");
    assert_eq!(doc.tags[1].description, None);
    assert_eq!(doc.tags[2].description.as_deref(), Some("(complexity: 5)"));
}

#[test]
fn continuation_lines_extend_the_previous_tag() {
    let doc = parse_jsdoc("@graphql fragment\n  UserFields");
    assert_eq!(doc.tags.len(), 1);
    assert_eq!(doc.tags[0].description.as_deref(), Some("fragment\nUserFields"));
}

#[test]
fn find_tag_returns_first_match() {
    let doc = parse_jsdoc("@graphql input\n@graphql schema");
    assert_eq!(doc.find_tag("graphql").map(|t| t.description_or_empty()), Some("input"));
    assert!(doc.find_tag("missing").is_none());
}

#[test]
fn lone_at_sign_is_text() {
    let doc = parse_jsdoc("mail me @ home");
    assert!(doc.tags.is_empty());
    assert_eq!(doc.description, "mail me @ home");
}
