//! JSON views of descriptors and parse results

use kingbase_sql_mapping::{MappingKind, ParsedStoreType, TypeMapping};
use serde_json::{Map, Value, json};

/// Describe a type mapping, recursing into container element descriptors
pub fn describe_mapping(mapping: &TypeMapping) -> Value {
    let mut out = Map::new();
    out.insert("store_type".into(), json!(mapping.store_type()));
    out.insert("base_store_type".into(), json!(mapping.base_store_type()));
    out.insert("host_type".into(), json!(mapping.host_type().to_string()));
    out.insert("db_type".into(), json!(mapping.db_type().to_string()));
    out.insert("kind".into(), json!(kind_name(mapping.kind())));
    if let Some(size) = mapping.size() {
        out.insert("size".into(), json!(size));
    }
    if let Some(precision) = mapping.precision() {
        out.insert("precision".into(), json!(precision));
    }
    if let Some(scale) = mapping.scale() {
        out.insert("scale".into(), json!(scale));
    }
    if mapping.is_fixed_length() {
        out.insert("fixed_length".into(), json!(true));
    }

    match mapping.kind() {
        MappingKind::Enum { labels } => {
            out.insert("labels".into(), json!(labels));
        }
        MappingKind::Array {
            element,
            element_nullable,
        } => {
            out.insert("element".into(), describe_mapping(element));
            out.insert("element_nullable".into(), json!(element_nullable));
        }
        MappingKind::Range { subtype } => {
            out.insert("subtype".into(), describe_mapping(subtype));
        }
        MappingKind::Multirange { range } => {
            out.insert("range".into(), describe_mapping(range));
        }
        MappingKind::Scalar => {}
    }
    Value::Object(out)
}

fn kind_name(kind: &MappingKind) -> &'static str {
    match kind {
        MappingKind::Scalar => "scalar",
        MappingKind::Enum { .. } => "enum",
        MappingKind::Array { .. } => "array",
        MappingKind::Range { .. } => "range",
        MappingKind::Multirange { .. } => "multirange",
    }
}

pub fn describe_parsed(parsed: &ParsedStoreType) -> Value {
    json!({
        "base_name": parsed.base_name,
        "is_unicode": parsed.is_unicode,
        "size": parsed.size,
        "precision": parsed.precision,
        "scale": parsed.scale,
    })
}
