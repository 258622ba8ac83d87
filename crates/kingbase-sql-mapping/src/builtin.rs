//! Built-in store types
//!
//! Every alias gets its own descriptor so that a descriptor's store type is
//! always the name it was registered under.

use kingbase_sql_types::{HostType, KingbaseDbType};

use crate::{LiteralOptions, MappingOptions, StoreFacets, TypeMapping};

/// One built-in leaf: aliases, host types in priority order, native tag
struct Leaf {
    names: &'static [&'static str],
    hosts: Vec<HostType>,
    db_type: KingbaseDbType,
    fixed_length: bool,
}

impl Leaf {
    fn new(names: &'static [&'static str], hosts: Vec<HostType>, db_type: KingbaseDbType) -> Self {
        Self {
            names,
            hosts,
            db_type,
            fixed_length: false,
        }
    }

    fn fixed(mut self) -> Self {
        self.fixed_length = true;
        self
    }
}

fn leaves(options: &MappingOptions) -> Vec<Leaf> {
    use HostType as H;
    use KingbaseDbType as Db;

    let legacy = options.legacy_timestamp_behavior;
    let (timestamp_hosts, timestamptz_hosts) = if legacy {
        (vec![H::DateTime, H::DateTimeUtc], vec![H::DateTimeUtc, H::DateTime])
    } else {
        (vec![H::DateTime], vec![H::DateTimeUtc])
    };

    vec![
        Leaf::new(&["boolean", "bool"], vec![H::Bool], Db::Boolean),
        Leaf::new(&["smallint", "int2"], vec![H::Int16], Db::Smallint),
        Leaf::new(&["integer", "int", "int4"], vec![H::Int32], Db::Integer),
        Leaf::new(&["bigint", "int8"], vec![H::Int64], Db::Bigint),
        Leaf::new(&["real", "float4"], vec![H::Float32], Db::Real),
        Leaf::new(&["double precision", "float8"], vec![H::Float64], Db::Double),
        Leaf::new(&["numeric", "decimal"], vec![H::Decimal], Db::Numeric),
        Leaf::new(&["money"], vec![H::Decimal], Db::Money),
        Leaf::new(&["text"], vec![H::String], Db::Text),
        Leaf::new(&["character varying", "varchar"], vec![H::String], Db::Varchar),
        Leaf::new(&["character", "char", "bpchar"], vec![H::String], Db::Char).fixed(),
        Leaf::new(&["citext"], vec![H::String], Db::Citext),
        Leaf::new(&["bytea"], vec![H::Bytes], Db::Bytea),
        Leaf::new(&["timestamp without time zone", "timestamp"], timestamp_hosts, Db::Timestamp),
        Leaf::new(&["timestamp with time zone", "timestamptz"], timestamptz_hosts, Db::TimestampTz),
        Leaf::new(&["date"], vec![H::Date], Db::Date),
        Leaf::new(&["time without time zone", "time"], vec![H::Time], Db::Time),
        Leaf::new(&["time with time zone", "timetz"], vec![H::TimeTz], Db::TimeTz),
        Leaf::new(&["interval"], vec![H::Interval], Db::Interval),
        Leaf::new(&["uuid"], vec![H::Uuid], Db::Uuid),
        Leaf::new(&["inet"], vec![H::IpAddress, H::IpNetwork], Db::Inet),
        Leaf::new(&["cidr"], vec![H::IpNetwork], Db::Cidr),
        Leaf::new(&["macaddr"], vec![H::MacAddress], Db::MacAddr),
        Leaf::new(&["macaddr8"], vec![H::MacAddress], Db::MacAddr8),
        Leaf::new(&["bit"], vec![H::BitString], Db::Bit).fixed(),
        Leaf::new(&["bit varying", "varbit"], vec![H::BitString], Db::Varbit),
        Leaf::new(&["jsonb"], vec![H::Json, H::String], Db::Jsonb),
        Leaf::new(&["json"], vec![H::Json, H::String], Db::Json),
        Leaf::new(&["tsvector"], vec![H::TsVector], Db::TsVector),
        Leaf::new(&["tsquery"], vec![H::TsQuery], Db::TsQuery),
        Leaf::new(&["regconfig"], vec![H::RegConfig], Db::RegConfig),
        Leaf::new(&["hstore"], vec![H::Dictionary], Db::Hstore),
        Leaf::new(&["ltree"], vec![H::LTree, H::String], Db::LTree),
    ]
}

/// All built-in leaf descriptors in registration order
pub(crate) fn leaf_mappings(options: &MappingOptions) -> Vec<TypeMapping> {
    let literal_options = LiteralOptions::from(options);
    let mut mappings = Vec::new();
    for leaf in leaves(options) {
        for name in leaf.names {
            for host in &leaf.hosts {
                let mut mapping = TypeMapping::scalar(*name, host.clone(), leaf.db_type.clone())
                    .with_literal_options(literal_options);
                if leaf.fixed_length {
                    mapping = mapping.with_fixed_length();
                }
                mappings.push(mapping);
            }
        }
    }
    mappings
}

/// Descriptor for a single character, `character(1)`
pub(crate) fn char_mapping(options: &MappingOptions) -> TypeMapping {
    TypeMapping::scalar("character", HostType::Char, KingbaseDbType::Char)
        .with_literal_options(LiteralOptions::from(options))
        .clone_with_facets(StoreFacets {
            size: Some(1),
            fixed_length: true,
            ..StoreFacets::default()
        })
}

/// Default store type per host type, used when no store type is requested
pub(crate) fn host_defaults(options: &MappingOptions) -> Vec<(HostType, &'static str)> {
    use HostType as H;

    let utc_default = if options.legacy_timestamp_behavior {
        "timestamp without time zone"
    } else {
        "timestamp with time zone"
    };

    vec![
        (H::Bool, "boolean"),
        (H::Int16, "smallint"),
        (H::Int32, "integer"),
        (H::Int64, "bigint"),
        (H::Float32, "real"),
        (H::Float64, "double precision"),
        (H::Decimal, "numeric"),
        (H::String, "text"),
        (H::Bytes, "bytea"),
        (H::DateTime, "timestamp without time zone"),
        (H::DateTimeUtc, utc_default),
        (H::Date, "date"),
        (H::Time, "time without time zone"),
        (H::TimeTz, "time with time zone"),
        (H::Interval, "interval"),
        (H::Uuid, "uuid"),
        (H::IpAddress, "inet"),
        (H::IpNetwork, "cidr"),
        (H::MacAddress, "macaddr"),
        (H::BitString, "bit varying"),
        (H::Json, "jsonb"),
        (H::TsVector, "tsvector"),
        (H::TsQuery, "tsquery"),
        (H::RegConfig, "regconfig"),
        (H::Dictionary, "hstore"),
        (H::LTree, "ltree"),
    ]
}

/// Built-in ranges: (range, multirange, subtype store type)
pub(crate) const RANGES: &[(&str, &str, &str)] = &[
    ("int4range", "int4multirange", "integer"),
    ("int8range", "int8multirange", "bigint"),
    ("numrange", "nummultirange", "numeric"),
    ("tsrange", "tsmultirange", "timestamp without time zone"),
    ("tstzrange", "tstzmultirange", "timestamp with time zone"),
    ("daterange", "datemultirange", "date"),
];

/// Store types that hold JSON documents
pub(crate) const JSON_STORE_TYPES: &[&str] = &["json", "jsonb"];

/// Fixed-width character store types
pub(crate) const FIXED_CHAR_STORE_TYPES: &[&str] = &["character", "char", "bpchar"];
