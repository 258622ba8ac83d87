//! Command implementations, exercised without the process boundary

#![cfg(feature = "cli")]

use kingbase_sql::cli::literal::{self, LiteralConfig};
use kingbase_sql::cli::map::{self, MapConfig};
use kingbase_sql::cli::{config, describe, types};
use kingbase_sql::diagnostics::{KB0001, KB0003, KbError};
use kingbase_sql::mapping::parse_store_type;
use kingbase_sql::TypeMappingRegistry;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn registry() -> TypeMappingRegistry {
    TypeMappingRegistry::default()
}

fn kb_code(error: &anyhow::Error) -> Option<kingbase_sql::diagnostics::ErrorCode> {
    error.downcast_ref::<KbError>().map(KbError::code)
}

#[test]
fn test_map_host_default() {
    let config = MapConfig {
        host_type: Some("Int32".into()),
        ..MapConfig::default()
    };
    let value = map::resolve(&registry(), &config).unwrap();
    assert_eq!(value["store_type"], json!("integer"));
    assert_eq!(value["kind"], json!("scalar"));
}

#[test]
fn test_map_sized_store_type() {
    let config = MapConfig {
        store_type: Some("varchar(20)".into()),
        ..MapConfig::default()
    };
    let value = map::resolve(&registry(), &config).unwrap();
    assert_eq!(value["store_type"], json!("varchar(20)"));
    assert_eq!(value["size"], json!(20));
}

#[test]
fn test_map_array_describes_element() {
    let config = MapConfig {
        host_type: Some("Array<String>".into()),
        ..MapConfig::default()
    };
    let value = map::resolve(&registry(), &config).unwrap();
    assert_eq!(value["store_type"], json!("text[]"));
    assert_eq!(value["element"]["store_type"], json!("text"));
}

#[test]
fn test_map_requires_some_input() {
    assert!(map::resolve(&registry(), &MapConfig::default()).is_err());
}

#[test]
fn test_map_absent_mapping_is_mapping_error() {
    let config = MapConfig {
        store_type: Some("integer".into()),
        host_type: Some("String".into()),
        ..MapConfig::default()
    };
    let err = map::resolve(&registry(), &config).unwrap_err();
    assert_eq!(kb_code(&err), Some(KB0001));
}

#[test]
fn test_map_unknown_host_type() {
    let config = MapConfig {
        host_type: Some("Quaternion".into()),
        ..MapConfig::default()
    };
    let err = map::resolve(&registry(), &config).unwrap_err();
    assert_eq!(kb_code(&err), Some(KB0003));
}

#[rstest]
#[case(None, r#"{"type":"Int32","value":5}"#, "5", "5")]
#[case(None, r#"{"type":"String","value":"O'Brien"}"#, "'O''Brien'", "\"O'Brien\"")]
#[case(Some("regconfig"), r#"{"type":"RegConfig","value":"english"}"#, "'english'::regconfig", "english")]
fn test_literal_render(
    #[case] store_type: Option<&str>,
    #[case] value: &str,
    #[case] toplevel: &str,
    #[case] embedded: &str,
) {
    let config = LiteralConfig {
        store_type: store_type.map(String::from),
        value: value.to_string(),
        ..LiteralConfig::default()
    };
    let rendered = literal::render(&registry(), &config).unwrap();
    assert_eq!(rendered["toplevel"], json!(toplevel));
    assert_eq!(rendered["embedded"], json!(embedded));
}

#[test]
fn test_literal_rejects_malformed_value() {
    let config = LiteralConfig {
        value: "5".to_string(),
        ..LiteralConfig::default()
    };
    assert!(literal::render(&registry(), &config).is_err());
}

#[test]
fn test_types_lists_builtins() {
    let listing = types::list(&registry());
    let rows = listing.as_array().unwrap();
    let names: Vec<&str> = rows.iter().filter_map(|r| r["store_type"].as_str()).collect();
    for expected in ["integer", "jsonb", "int4range", "regconfig"] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
}

#[test]
fn test_parse_type_description() {
    let value = describe::describe_parsed(&parse_store_type("numeric(10,2)"));
    assert_eq!(value["base_name"], json!("numeric"));
    assert_eq!(value["precision"], json!(10));
    assert_eq!(value["scale"], json!(2));
}

#[test]
fn test_default_options_without_file() {
    let options = config::load_options(None).unwrap();
    assert_eq!(options, kingbase_sql::MappingOptions::default());
}
