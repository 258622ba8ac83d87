//! Registry resolution tests

use chrono::DateTime;
use indexmap::IndexMap;
use kingbase_sql_diagnostics::{KB0201, KB0300};
use kingbase_sql_mapping::{
    ElementNullability, MappingOptions, MappingRequest, PropertyInfo, StoreFacets,
    TypeMappingRegistry, UserRangeDefinition,
};
use kingbase_sql_types::{HostType, HostValue, KingbaseDbType, RangeValue};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn registry() -> TypeMappingRegistry {
    TypeMappingRegistry::default()
}

#[rstest]
#[case("boolean")]
#[case("bool")]
#[case("smallint")]
#[case("int2")]
#[case("integer")]
#[case("int")]
#[case("int4")]
#[case("bigint")]
#[case("int8")]
#[case("real")]
#[case("float4")]
#[case("double precision")]
#[case("float8")]
#[case("numeric")]
#[case("decimal")]
#[case("money")]
#[case("text")]
#[case("character varying")]
#[case("varchar")]
#[case("character")]
#[case("char")]
#[case("bpchar")]
#[case("citext")]
#[case("bytea")]
#[case("timestamp without time zone")]
#[case("timestamp")]
#[case("timestamp with time zone")]
#[case("timestamptz")]
#[case("date")]
#[case("time without time zone")]
#[case("time")]
#[case("time with time zone")]
#[case("timetz")]
#[case("interval")]
#[case("uuid")]
#[case("inet")]
#[case("cidr")]
#[case("macaddr")]
#[case("macaddr8")]
#[case("bit")]
#[case("bit varying")]
#[case("varbit")]
#[case("json")]
#[case("jsonb")]
#[case("tsvector")]
#[case("tsquery")]
#[case("regconfig")]
#[case("hstore")]
#[case("ltree")]
#[case("int4range")]
#[case("int8range")]
#[case("numrange")]
#[case("tsrange")]
#[case("tstzrange")]
#[case("daterange")]
#[case("int4multirange")]
#[case("int8multirange")]
#[case("nummultirange")]
#[case("tsmultirange")]
#[case("tstzmultirange")]
#[case("datemultirange")]
fn test_store_name_round_trip(#[case] name: &str) {
    let mapping = registry().find_mapping_for_store(name).unwrap();
    assert_eq!(mapping.store_type(), name);
}

#[test]
fn test_every_registered_pair_resolves_to_its_host_type() {
    let registry = registry();
    let names: Vec<String> = registry.store_type_names().map(str::to_string).collect();
    assert!(!names.is_empty());
    for name in &names {
        for registered in registry.mappings_for_store_type(name) {
            let host = registered.host_type().clone();
            let mapping = registry
                .find_mapping(&MappingRequest::new(name.as_str(), host.clone()))
                .unwrap();
            assert_eq!(mapping.host_type(), &host, "store type {}", name);
        }
    }
}

#[rstest]
#[case("integer", HostType::String)]
#[case("text", HostType::Int32)]
#[case("uuid", HostType::Bytes)]
#[case("int4range", HostType::range(HostType::Int64))]
#[case("date", HostType::record("Blog"))]
fn test_unregistered_pair_is_absent(#[case] store: &str, #[case] host: HostType) {
    assert!(registry().find_mapping(&MappingRequest::new(store, host)).is_none());
}

#[test]
fn test_scenario_integer_host_default() {
    let mapping = registry().find_mapping_for_host(&HostType::Int32).unwrap();
    assert_eq!(mapping.store_type(), "integer");
    assert_eq!(mapping.db_type(), &KingbaseDbType::Integer);
    assert_eq!(mapping.render_toplevel(&HostValue::Int32(5)).unwrap(), "5");
}

#[rstest]
#[case(HostType::Int16, HostValue::Int16(i16::MIN), "(-32768)::smallint")]
#[case(HostType::Int16, HostValue::Int16(7), "7::smallint")]
#[case(HostType::Int64, HostValue::Int64(i64::MIN), "(-9223372036854775808)::bigint")]
#[case(HostType::Int64, HostValue::Int64(-1), "(-1)::bigint")]
#[case(HostType::Float32, HostValue::Float32(-1.5), "(-1.5)::real")]
fn test_negative_cast_literals_are_parenthesized(
    #[case] host: HostType,
    #[case] value: HostValue,
    #[case] expected: &str,
) {
    let mapping = registry().find_mapping_for_host(&host).unwrap();
    assert_eq!(mapping.render_toplevel(&value).unwrap(), expected);
}

#[test]
fn test_scenario_jsonb_record_escape_hatch() {
    let mapping = registry()
        .find_mapping(&MappingRequest::new("jsonb", HostType::record("Blog")))
        .unwrap();
    assert_eq!(mapping.store_type(), "jsonb");
    assert_eq!(mapping.host_type(), &HostType::record("Blog"));

    let mut fields = IndexMap::new();
    fields.insert("name".to_string(), HostValue::string("O'Brien"));
    fields.insert("posts".to_string(), HostValue::Int32(2));
    assert_eq!(
        mapping.render_toplevel(&HostValue::Record(fields)).unwrap(),
        r#"'{"name":"O''Brien","posts":2}'"#
    );
}

#[rstest]
#[case(HostType::Int32)]
#[case(HostType::String)]
#[case(HostType::Date)]
#[case(HostType::Uuid)]
#[case(HostType::Decimal)]
#[case(HostType::range(HostType::Int32))]
fn test_array_round_trip(#[case] element: HostType) {
    let registry = registry();
    let element_mapping = registry.find_mapping_for_host(&element).unwrap();

    for host in [HostType::array(element.clone()), HostType::list(element.clone())] {
        let array = registry.find_mapping_for_host(&host).unwrap();
        assert_eq!(array.element().unwrap().as_ref(), element_mapping.as_ref());
        assert_eq!(array.store_type(), format!("{}[]", element_mapping.store_type()));
        assert_eq!(array.host_type(), &host);
    }
}

#[test]
fn test_array_of_array_fails() {
    let registry = registry();
    let nested = HostType::array(HostType::array(HostType::Int32));
    assert!(registry.find_mapping_for_host(&nested).is_none());
    assert!(registry.find_mapping_for_store("integer[][]").is_none());

    let element = registry.find_mapping_for_host(&HostType::array(HostType::Int32)).unwrap();
    assert!(registry.find_array_mapping(&element, false).is_err());
}

#[test]
fn test_array_by_store_name() {
    let registry = registry();
    let array = registry.find_mapping_for_store("varchar(32)[]").unwrap();
    assert_eq!(array.store_type(), "varchar(32)[]");
    assert_eq!(array.element().unwrap().size(), Some(32));
    assert_eq!(array.host_type(), &HostType::array(HostType::String));
}

#[rstest]
#[case("varchar(32)", HostType::String, "varchar(32)")]
#[case("numeric(10,2)", HostType::Decimal, "numeric(10,2)")]
#[case("timestamp(3) with time zone", HostType::DateTimeUtc, "timestamp(3) with time zone")]
#[case("bit varying(12)", HostType::BitString, "bit varying(12)")]
fn test_store_type_with_modifiers(#[case] store: &str, #[case] host: HostType, #[case] expected: &str) {
    let mapping = registry().find_mapping(&MappingRequest::new(store, host)).unwrap();
    assert_eq!(mapping.store_type(), expected);
}

#[test]
fn test_modifier_facets_are_recorded() {
    let mapping = registry()
        .find_mapping(&MappingRequest::new("numeric(10,2)", HostType::Decimal))
        .unwrap();
    assert_eq!(mapping.precision(), Some(10));
    assert_eq!(mapping.scale(), Some(2));
    assert_eq!(mapping.base_store_type(), "numeric");
}

#[rstest]
#[case("character", true)]
#[case("char(1)", true)]
#[case("bpchar", true)]
#[case("character(5)", false)]
fn test_single_character(#[case] store: &str, #[case] resolves: bool) {
    let mapping = registry().find_mapping(&MappingRequest::new(store, HostType::Char));
    assert_eq!(mapping.is_some(), resolves);
    if let Some(mapping) = mapping {
        assert_eq!(mapping.store_type(), "character(1)");
        assert_eq!(mapping.render_toplevel(&HostValue::Char('x')).unwrap(), "'x'");
    }
}

#[test]
fn test_fixed_length_string_without_size() {
    let mapping = registry()
        .find_mapping(&MappingRequest::new("character", HostType::String))
        .unwrap();
    assert_eq!(mapping.store_type(), "character");
    assert!(mapping.is_fixed_length());
}

#[rstest]
#[case(MappingRequest::for_host(HostType::String).with_size(32), "character varying(32)")]
#[case(MappingRequest::for_host(HostType::String).with_size(32).with_fixed_length(true), "character(32)")]
#[case(MappingRequest::for_host(HostType::String).with_size(10_485_761), "text")]
#[case(MappingRequest::for_host(HostType::String).with_size(10_485_760), "character varying(10485760)")]
#[case(MappingRequest::for_host(HostType::BitString).with_size(8).with_fixed_length(true), "bit(8)")]
#[case(MappingRequest::for_host(HostType::BitString).with_size(20_000_000), "bit varying")]
#[case(MappingRequest::for_host(HostType::String), "text")]
#[case(MappingRequest::for_host(HostType::Decimal).with_precision(18, Some(4)), "numeric(18,4)")]
#[case(MappingRequest::for_host(HostType::Int32).with_size(4), "integer")]
fn test_host_lookup_with_facets(#[case] request: MappingRequest, #[case] expected: &str) {
    assert_eq!(registry().find_mapping(&request).unwrap().store_type(), expected);
}

#[test]
fn test_key_string_default_size() {
    let registry =
        TypeMappingRegistry::new(MappingOptions::new().with_key_string_default_size(256)).unwrap();
    let key = MappingRequest::for_host(HostType::String).as_key_or_index();
    assert_eq!(registry.find_mapping(&key).unwrap().store_type(), "character varying(256)");

    let plain = MappingRequest::for_host(HostType::String);
    assert_eq!(registry.find_mapping(&plain).unwrap().store_type(), "text");
}

#[test]
fn test_user_range() {
    let options = MappingOptions::new().with_user_range(
        UserRangeDefinition::new("floatrange", HostType::Float64)
            .with_subtype_store_type("double precision"),
    );
    let registry = TypeMappingRegistry::new(options).unwrap();

    let by_name = registry.find_mapping_for_store("floatrange").unwrap();
    assert_eq!(by_name.subtype().unwrap().store_type(), "double precision");

    let by_host = registry
        .find_mapping_for_host(&HostType::range(HostType::Float64))
        .unwrap();
    assert_eq!(by_host.store_type(), "floatrange");

    let value = HostValue::Range(RangeValue::closed(HostValue::Float64(1.5), HostValue::Float64(2.5)));
    assert_eq!(by_host.render_toplevel(&value).unwrap(), "'[1.5,2.5]'::floatrange");

    let double = registry.find_mapping_for_host(&HostType::Float64).unwrap();
    assert_eq!(registry.find_range_mapping(&double).unwrap().store_type(), "floatrange");
}

#[test]
fn test_schema_qualified_user_range() {
    let options = MappingOptions::new()
        .with_user_range(UserRangeDefinition::new("floatrange", HostType::Float64).with_schema("app"));
    let registry = TypeMappingRegistry::new(options).unwrap();
    assert_eq!(registry.find_mapping_for_store("floatrange").unwrap().store_type(), "app.floatrange");
    assert_eq!(registry.find_mapping_for_store("app.floatrange").unwrap().store_type(), "app.floatrange");
}

#[test]
fn test_unresolvable_user_range_subtype() {
    let options = MappingOptions::new()
        .with_user_range(UserRangeDefinition::new("blogrange", HostType::record("Blog")));
    let err = TypeMappingRegistry::new(options).unwrap_err();
    assert_eq!(err.code(), KB0300);
}

#[test]
fn test_container_inference() {
    let registry = registry();
    let integer = registry.find_mapping_for_store("integer").unwrap();
    let date = registry.find_mapping_for_store("date").unwrap();
    let int4 = registry.find_mapping_for_store("int4").unwrap();

    assert_eq!(registry.find_range_mapping(&integer).unwrap().store_type(), "int4range");
    assert_eq!(registry.find_multirange_mapping(&date).unwrap().store_type(), "datemultirange");
    // Inner store type must match exactly
    assert!(registry.find_range_mapping(&int4).is_none());
}

#[test]
fn test_property_element_nullability() {
    let registry = registry();

    let ints = PropertyInfo::new("scores", HostType::list(HostType::Int32));
    assert_eq!(registry.find_mapping_for_property(&ints).unwrap().element_nullable, Some(false));

    let tags = PropertyInfo::new("tags", HostType::array(HostType::String));
    assert_eq!(registry.find_mapping_for_property(&tags).unwrap().element_nullable, Some(true));

    let required = tags.with_element_nullability(ElementNullability::NonNullable);
    let mapped = registry.find_mapping_for_property(&required).unwrap();
    assert_eq!(mapped.element_nullable, Some(false));
    assert_eq!(mapped.mapping.element_nullable(), Some(false));

    let title = PropertyInfo::new("title", HostType::String).with_facets(StoreFacets::sized(200));
    let mapped = registry.find_mapping_for_property(&title).unwrap();
    assert_eq!(mapped.mapping.store_type(), "character varying(200)");
    assert_eq!(mapped.element_nullable, None);
}

#[test]
fn test_utc_timestamps() {
    let registry = registry();
    let mapping = registry.find_mapping_for_host(&HostType::DateTimeUtc).unwrap();
    assert_eq!(mapping.store_type(), "timestamp with time zone");

    let utc = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z").unwrap();
    assert_eq!(
        mapping.render_toplevel(&HostValue::DateTimeUtc(utc)).unwrap(),
        "'2024-01-02T03:04:05Z'::timestamp with time zone"
    );

    let offset = DateTime::parse_from_rfc3339("2024-01-02T03:04:05+02:00").unwrap();
    let err = mapping.render_toplevel(&HostValue::DateTimeUtc(offset)).unwrap_err();
    assert_eq!(err.code(), KB0201);
}

#[test]
fn test_legacy_timestamps() {
    let registry =
        TypeMappingRegistry::new(MappingOptions::new().with_legacy_timestamp_behavior(true)).unwrap();
    let default = registry.find_mapping_for_host(&HostType::DateTimeUtc).unwrap();
    assert_eq!(default.store_type(), "timestamp without time zone");

    let tz = registry
        .find_mapping(&MappingRequest::new("timestamptz", HostType::DateTimeUtc))
        .unwrap();
    let offset = DateTime::parse_from_rfc3339("2024-01-02T03:04:05+02:00").unwrap();
    assert_eq!(
        tz.render_toplevel(&HostValue::DateTimeUtc(offset)).unwrap(),
        "'2024-01-02T01:04:05Z'::timestamptz"
    );
}

#[test]
fn test_enums_from_options() {
    let mut labels = IndexMap::new();
    labels.insert("Happy".to_string(), "happy".to_string());
    labels.insert("Sad".to_string(), "sad".to_string());
    let options = MappingOptions::new()
        .with_enum(kingbase_sql_mapping::EnumDefinition::new("mood", labels));
    let registry = TypeMappingRegistry::new(options).unwrap();

    let mapping = registry.find_mapping_for_host(&HostType::enumeration("mood")).unwrap();
    assert_eq!(mapping.db_type(), &KingbaseDbType::Enum);
    assert_eq!(mapping.render_toplevel(&HostValue::Enum("Sad".into())).unwrap(), "'sad'::mood");

    let array = registry
        .find_mapping_for_host(&HostType::array(HostType::enumeration("mood")))
        .unwrap();
    let value = HostValue::Array(vec![HostValue::Enum("Happy".into()), HostValue::Enum("Sad".into())]);
    assert_eq!(array.render_toplevel(&value).unwrap(), "ARRAY['happy','sad']::mood[]");
}
