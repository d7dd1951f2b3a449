//! Tests for TOML schema files

use std::collections::BTreeMap;

use envcmd::application::parse_schema;
use envcmd::application::services::ConfigBinder;
use envcmd::domain::{DomainError, FieldKind, Value};
use rstest::rstest;

const SCHEMA: &str = r#"
[[field]]
name = "port"
kind = "int"
env = "APP_PORT"
default = "8080"

[[field]]
name = "hosts"
kind = "list<string>"
env = "HOSTS"

[[field]]
name = "database"
kind = "record"

  [[field.fields]]
  name = "dsn"
  kind = "string"
  env = "DB_DSN"
  required = true
"#;

#[test]
fn given_schema_file_when_parsing_then_builds_field_tree() {
    // Act
    let schema = parse_schema(SCHEMA).unwrap();

    // Assert
    assert_eq!(schema.len(), 3);
    assert_eq!(schema[0].name, "port");
    assert_eq!(schema[0].kind, FieldKind::Int);
    assert_eq!(schema[0].source_key(), Some("APP_PORT"));
    assert_eq!(schema[0].default_literal(), Some("8080"));
    assert_eq!(schema[1].kind, FieldKind::list(FieldKind::String));

    let FieldKind::Record(children) = &schema[2].kind else {
        panic!("database should be a record");
    };
    assert_eq!(children[0].name, "dsn");
    assert!(children[0].required);
}

#[test]
fn given_parsed_schema_when_binding_then_resolves_against_env() {
    // Arrange
    let schema = parse_schema(SCHEMA).unwrap();
    let env: BTreeMap<String, String> = [("DB_DSN", "postgres://db"), ("HOSTS", "a,b")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    // Act
    let bound = ConfigBinder::new().bind(&schema, &env).unwrap();

    // Assert
    assert_eq!(bound.get("port"), Some(&Value::Int(8080)));
    assert_eq!(bound.strings("hosts").unwrap(), vec!["a", "b"]);
    assert_eq!(bound.record("database").unwrap().str("dsn").unwrap(), "postgres://db");
}

#[test]
fn given_empty_document_when_parsing_then_schema_is_empty() {
    assert!(parse_schema("").unwrap().is_empty());
}

#[rstest]
#[case::unknown_kind("[[field]]\nname = \"x\"\nkind = \"duration\"\n")]
#[case::unknown_key("[[field]]\nname = \"x\"\nkind = \"int\"\nenvv = \"X\"\n")]
#[case::record_with_env("[[field]]\nname = \"x\"\nkind = \"record\"\nenv = \"X\"\n")]
#[case::scalar_with_children(
    "[[field]]\nname = \"x\"\nkind = \"int\"\n[[field.fields]]\nname = \"y\"\nkind = \"int\"\n"
)]
#[case::bad_toml("[[field]\n")]
fn given_malformed_schema_when_parsing_then_invalid_schema(#[case] content: &str) {
    let err = parse_schema(content).unwrap_err();

    assert!(
        matches!(err.as_domain(), Some(DomainError::InvalidSchema { .. })),
        "unexpected error: {err:?}"
    );
}

#[test]
fn given_list_of_bool_when_binding_then_unsupported_type() {
    // Arrange
    let content = "[[field]]\nname = \"flags\"\nkind = \"list<bool>\"\nenv = \"FLAGS\"\n";
    let schema = parse_schema(content).unwrap();
    let env: BTreeMap<String, String> = [("FLAGS".to_string(), "true".to_string())].into();

    // Act
    let err = ConfigBinder::new().bind(&schema, &env).unwrap_err();

    // Assert
    assert!(matches!(err, DomainError::UnsupportedType { .. }));
}
