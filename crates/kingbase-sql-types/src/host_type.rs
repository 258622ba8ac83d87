//! Host Type System
//!
//! This module defines the program-side type vocabulary:
//! - HostType enum representing every value type the registry can map
//! - Container shapes (arrays, lists, ranges, multiranges, tuples)
//! - Parsing from the textual notation used by configuration and the CLI

use kingbase_sql_diagnostics::{ErrorBuilder, KB0003, KbError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use winnow::ascii::space0;
use winnow::combinator::{delimited, fail, preceded, separated};
use winnow::prelude::*;
use winnow::token::take_while;

/// A program-side value type
///
/// Identity is structural: two `HostType` values describe the same type iff
/// they compare equal, which makes the type usable as a registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostType {
    // === Primitive Types ===
    /// Boolean
    Bool,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// Arbitrary precision decimal
    Decimal,
    /// Single character
    Char,
    /// Unicode string
    String,
    /// Byte sequence
    Bytes,

    // === Temporal Types ===
    /// Date and time without time zone
    DateTime,
    /// Instant in time, normalized to UTC
    DateTimeUtc,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Time of day with a UTC offset
    TimeTz,
    /// Duration (months, days, microseconds)
    Interval,

    // === Special Scalar Types ===
    /// 128-bit UUID
    Uuid,
    /// IPv4 or IPv6 host address
    IpAddress,
    /// IPv4 or IPv6 network (address and prefix length)
    IpNetwork,
    /// MAC address (6 or 8 bytes)
    MacAddress,
    /// Bit vector
    BitString,
    /// Parsed JSON document
    Json,
    /// Full-text search document
    TsVector,
    /// Full-text search query
    TsQuery,
    /// Full-text search configuration name
    RegConfig,
    /// String-to-optional-string dictionary
    Dictionary,
    /// Hierarchical label path
    LTree,

    // === Container Types ===
    /// Fixed-size array of elements
    Array(Box<HostType>),
    /// Growable list of elements
    List(Box<HostType>),
    /// Range over a subtype
    Range(Box<HostType>),
    /// Multirange over a subtype (list of ranges)
    Multirange(Box<HostType>),
    /// Positional tuple of values
    Tuple(Vec<HostType>),

    // === Named Types ===
    /// User enumeration registered with the registry
    Enum(String),
    /// Arbitrary user record, mapped through JSON
    Record(String),
}

impl HostType {
    // === Constructors ===

    /// Create an array type
    pub fn array(element: HostType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Create a list type
    pub fn list(element: HostType) -> Self {
        Self::List(Box::new(element))
    }

    /// Create a range type
    pub fn range(subtype: HostType) -> Self {
        Self::Range(Box::new(subtype))
    }

    /// Create a multirange type
    pub fn multirange(subtype: HostType) -> Self {
        Self::Multirange(Box::new(subtype))
    }

    /// Create a tuple type
    pub fn tuple(elements: Vec<HostType>) -> Self {
        Self::Tuple(elements)
    }

    /// Create an enum type
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    /// Create a record type
    pub fn record(name: impl Into<String>) -> Self {
        Self::Record(name.into())
    }

    // === Type Properties ===

    /// Check if this is an integer type
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int16 | Self::Int32 | Self::Int64 | Self::Float32 | Self::Float64 | Self::Decimal
        )
    }

    /// Check if this is a temporal type
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::DateTime | Self::DateTimeUtc | Self::Date | Self::Time | Self::TimeTz | Self::Interval
        )
    }

    /// Check if this is a sequence type (array or list)
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Array(_) | Self::List(_))
    }

    /// Check if this is a range type
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    /// Check if this is a multirange type
    pub fn is_multirange(&self) -> bool {
        matches!(self, Self::Multirange(_))
    }

    /// Check if this is an enum type
    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// Get the element type for sequence types
    pub fn sequence_element(&self) -> Option<&HostType> {
        match self {
            Self::Array(elem) | Self::List(elem) => Some(elem),
            _ => None,
        }
    }

    /// Get the subtype for range and multirange types
    pub fn range_subtype(&self) -> Option<&HostType> {
        match self {
            Self::Range(sub) | Self::Multirange(sub) => Some(sub),
            _ => None,
        }
    }

    /// Get tuple element types
    pub fn tuple_elements(&self) -> Option<&[HostType]> {
        match self {
            Self::Tuple(elements) => Some(elements),
            _ => None,
        }
    }

    /// Get the simple name of this type
    pub fn name(&self) -> &str {
        match self {
            Self::Bool => "Bool",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Decimal => "Decimal",
            Self::Char => "Char",
            Self::String => "String",
            Self::Bytes => "Bytes",
            Self::DateTime => "DateTime",
            Self::DateTimeUtc => "DateTimeUtc",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::TimeTz => "TimeTz",
            Self::Interval => "Interval",
            Self::Uuid => "Uuid",
            Self::IpAddress => "IpAddress",
            Self::IpNetwork => "IpNetwork",
            Self::MacAddress => "MacAddress",
            Self::BitString => "BitString",
            Self::Json => "Json",
            Self::TsVector => "TsVector",
            Self::TsQuery => "TsQuery",
            Self::RegConfig => "RegConfig",
            Self::Dictionary => "Dictionary",
            Self::LTree => "LTree",
            Self::Array(_) => "Array",
            Self::List(_) => "List",
            Self::Range(_) => "Range",
            Self::Multirange(_) => "Multirange",
            Self::Tuple(_) => "Tuple",
            Self::Enum(name) | Self::Record(name) => name,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(inner) => write!(f, "Array<{}>", inner),
            Self::List(inner) => write!(f, "List<{}>", inner),
            Self::Range(inner) => write!(f, "Range<{}>", inner),
            Self::Multirange(inner) => write!(f, "Multirange<{}>", inner),
            Self::Tuple(elements) => {
                write!(f, "Tuple<")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, ">")
            }
            Self::Enum(name) => write!(f, "Enum:{}", name),
            Self::Record(name) => write!(f, "Record:{}", name),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl FromStr for HostType {
    type Err = KbError;

    /// Parse the notation produced by `Display`, e.g. `Array<Range<Int32>>`,
    /// `Tuple<Float64,Float64>`, `Enum:mood`, `Record:Blog`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        host_type.parse(s).map_err(|_| {
            ErrorBuilder::new(KB0003, format!("Unknown host type '{}'", s))
                .subject(s)
                .mapping()
        })
    }
}

fn host_type(input: &mut &str) -> ModalResult<HostType> {
    let name = take_while(1.., |c: char| c.is_ascii_alphanumeric()).parse_next(input)?;
    match name {
        "Array" => type_argument.map(HostType::array).parse_next(input),
        "List" => type_argument.map(HostType::list).parse_next(input),
        "Range" => type_argument.map(HostType::range).parse_next(input),
        "Multirange" => type_argument.map(HostType::multirange).parse_next(input),
        "Tuple" => delimited(
            ('<', space0),
            separated(1.., host_type, (space0, ',', space0)),
            (space0, '>'),
        )
        .map(HostType::Tuple)
        .parse_next(input),
        "Enum" => preceded(':', type_label)
            .map(|name: &str| HostType::enumeration(name))
            .parse_next(input),
        "Record" => preceded(':', type_label)
            .map(|name: &str| HostType::record(name))
            .parse_next(input),
        other => match scalar_host_type(other) {
            Some(scalar) => Ok(scalar),
            None => fail(input),
        },
    }
}

/// `<T>` argument of a single-parameter container
fn type_argument(input: &mut &str) -> ModalResult<HostType> {
    delimited(('<', space0), host_type, (space0, '>')).parse_next(input)
}

/// Enum or record name; runs until a delimiter of the enclosing notation
fn type_label<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| !matches!(c, ',' | '<' | '>') && !c.is_whitespace()).parse_next(input)
}

fn scalar_host_type(name: &str) -> Option<HostType> {
    let ty = match name {
        "Bool" => HostType::Bool,
        "Int16" => HostType::Int16,
        "Int32" => HostType::Int32,
        "Int64" => HostType::Int64,
        "Float32" => HostType::Float32,
        "Float64" => HostType::Float64,
        "Decimal" => HostType::Decimal,
        "Char" => HostType::Char,
        "String" => HostType::String,
        "Bytes" => HostType::Bytes,
        "DateTime" => HostType::DateTime,
        "DateTimeUtc" => HostType::DateTimeUtc,
        "Date" => HostType::Date,
        "Time" => HostType::Time,
        "TimeTz" => HostType::TimeTz,
        "Interval" => HostType::Interval,
        "Uuid" => HostType::Uuid,
        "IpAddress" => HostType::IpAddress,
        "IpNetwork" => HostType::IpNetwork,
        "MacAddress" => HostType::MacAddress,
        "BitString" => HostType::BitString,
        "Json" => HostType::Json,
        "TsVector" => HostType::TsVector,
        "TsQuery" => HostType::TsQuery,
        "RegConfig" => HostType::RegConfig,
        "Dictionary" => HostType::Dictionary,
        "LTree" => HostType::LTree,
        _ => return None,
    };
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let types = [
            HostType::Int32,
            HostType::array(HostType::String),
            HostType::list(HostType::range(HostType::Date)),
            HostType::multirange(HostType::Int64),
            HostType::tuple(vec![HostType::Float64, HostType::array(HostType::Int32)]),
            HostType::enumeration("mood"),
            HostType::record("Blog"),
        ];
        for ty in types {
            let parsed: HostType = ty.to_string().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn test_unknown_type_name() {
        let err = "Int128".parse::<HostType>().unwrap_err();
        assert_eq!(err.code(), KB0003);
        assert!("Array<Int32".parse::<HostType>().is_err());
        assert!("Array<Int32>>".parse::<HostType>().is_err());
        assert!("Tuple<>".parse::<HostType>().is_err());
        assert!("Enum:".parse::<HostType>().is_err());
    }

    #[test]
    fn test_nested_notation_with_spaces() {
        let parsed: HostType = "Tuple< Array<Range<Int32>> , Enum:public.mood >".parse().unwrap();
        assert_eq!(
            parsed,
            HostType::tuple(vec![
                HostType::array(HostType::range(HostType::Int32)),
                HostType::enumeration("public.mood"),
            ])
        );
    }

    #[test]
    fn test_container_accessors() {
        let list = HostType::list(HostType::Int32);
        assert!(list.is_sequence());
        assert_eq!(list.sequence_element(), Some(&HostType::Int32));
        assert_eq!(HostType::range(HostType::Decimal).range_subtype(), Some(&HostType::Decimal));
        assert!(HostType::Int16.is_integer());
        assert!(!HostType::Decimal.is_integer());
    }
}
