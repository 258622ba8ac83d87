//! Host values - runtime representation of values rendered as SQL literals
//!
//! This module defines the HostValue enum and the supporting range types.
//! Range shapes are explicit variants so that boundary facts are read with a
//! pattern match.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

use crate::HostType;

/// A runtime value of some host type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum HostValue {
    /// Null value
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Char(char),
    String(String),
    Bytes(Vec<u8>),

    // === Temporal ===
    DateTime(NaiveDateTime),
    /// Instant with its original offset; UTC-only store types reject non-zero offsets
    DateTimeUtc(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
    TimeTz(TimeTzValue),
    Interval(IntervalValue),

    // === Special scalars ===
    Uuid(Uuid),
    IpAddress(IpAddr),
    IpNetwork(IpNetworkValue),
    MacAddress(Vec<u8>),
    BitString(Vec<bool>),
    Json(JsonValue),
    TsVector(String),
    TsQuery(String),
    RegConfig(String),
    Dictionary(IndexMap<String, Option<String>>),
    LTree(String),

    // === Containers ===
    Array(Vec<HostValue>),
    Range(RangeValue),
    Multirange(Vec<RangeValue>),
    Tuple(Vec<HostValue>),

    // === Named ===
    /// Enum variant name (mapped to a database label by the enum mapping)
    Enum(String),
    /// User record, serialized through JSON
    Record(IndexMap<String, HostValue>),
}

impl HostValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a range value
    pub fn range(value: RangeValue) -> Self {
        Self::Range(value)
    }

    /// Get the host type of this value when it can be determined from the value alone
    ///
    /// Returns `None` for nulls, empty containers and named types.
    pub fn host_type(&self) -> Option<HostType> {
        let ty = match self {
            Self::Null => return None,
            Self::Bool(_) => HostType::Bool,
            Self::Int16(_) => HostType::Int16,
            Self::Int32(_) => HostType::Int32,
            Self::Int64(_) => HostType::Int64,
            Self::Float32(_) => HostType::Float32,
            Self::Float64(_) => HostType::Float64,
            Self::Decimal(_) => HostType::Decimal,
            Self::Char(_) => HostType::Char,
            Self::String(_) => HostType::String,
            Self::Bytes(_) => HostType::Bytes,
            Self::DateTime(_) => HostType::DateTime,
            Self::DateTimeUtc(_) => HostType::DateTimeUtc,
            Self::Date(_) => HostType::Date,
            Self::Time(_) => HostType::Time,
            Self::TimeTz(_) => HostType::TimeTz,
            Self::Interval(_) => HostType::Interval,
            Self::Uuid(_) => HostType::Uuid,
            Self::IpAddress(_) => HostType::IpAddress,
            Self::IpNetwork(_) => HostType::IpNetwork,
            Self::MacAddress(_) => HostType::MacAddress,
            Self::BitString(_) => HostType::BitString,
            Self::Json(_) => HostType::Json,
            Self::TsVector(_) => HostType::TsVector,
            Self::TsQuery(_) => HostType::TsQuery,
            Self::RegConfig(_) => HostType::RegConfig,
            Self::Dictionary(_) => HostType::Dictionary,
            Self::LTree(_) => HostType::LTree,
            Self::Array(elements) => {
                HostType::array(elements.iter().find_map(HostValue::host_type)?)
            }
            Self::Range(range) => HostType::range(range.subtype()?),
            Self::Multirange(ranges) => {
                HostType::multirange(ranges.iter().find_map(RangeValue::subtype)?)
            }
            Self::Tuple(elements) => HostType::tuple(
                elements
                    .iter()
                    .map(HostValue::host_type)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Self::Enum(_) | Self::Record(_) => return None,
        };
        Some(ty)
    }

    /// Convert to a JSON document
    ///
    /// Non-finite floats become JSON null; temporal values use ISO 8601 text.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int16(i) => JsonValue::from(*i),
            Self::Int32(i) => JsonValue::from(*i),
            Self::Int64(i) => JsonValue::from(*i),
            Self::Float32(v) => float_to_json(f64::from(*v)),
            Self::Float64(v) => float_to_json(*v),
            Self::Decimal(d) => match d.to_i64() {
                Some(i) if d.fract().is_zero() => JsonValue::from(i),
                _ => d.to_f64().map(float_to_json).unwrap_or(JsonValue::Null),
            },
            Self::Char(c) => JsonValue::String(c.to_string()),
            Self::String(s)
            | Self::TsVector(s)
            | Self::TsQuery(s)
            | Self::RegConfig(s)
            | Self::LTree(s)
            | Self::Enum(s) => JsonValue::String(s.clone()),
            Self::Bytes(bytes) | Self::MacAddress(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
            Self::DateTime(dt) => JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Self::DateTimeUtc(dt) => JsonValue::String(dt.to_rfc3339()),
            Self::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Self::Time(t) => JsonValue::String(t.format("%H:%M:%S%.f").to_string()),
            Self::TimeTz(t) => JsonValue::String(t.to_string()),
            Self::Interval(i) => JsonValue::String(i.to_string()),
            Self::Uuid(u) => JsonValue::String(u.to_string()),
            Self::IpAddress(ip) => JsonValue::String(ip.to_string()),
            Self::IpNetwork(net) => JsonValue::String(net.to_string()),
            Self::BitString(bits) => JsonValue::String(bits_to_string(bits)),
            Self::Json(doc) => doc.clone(),
            Self::Dictionary(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| {
                        let value = v.clone().map(JsonValue::String).unwrap_or(JsonValue::Null);
                        (k.clone(), value)
                    })
                    .collect(),
            ),
            Self::Array(elements) | Self::Tuple(elements) => {
                JsonValue::Array(elements.iter().map(HostValue::to_json).collect())
            }
            Self::Range(range) => JsonValue::String(range.to_string()),
            Self::Multirange(ranges) => {
                JsonValue::Array(ranges.iter().map(|r| JsonValue::String(r.to_string())).collect())
            }
            Self::Record(fields) => JsonValue::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

fn float_to_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Render a bit vector as a string of `0`/`1`
pub fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int16(i) => write!(f, "{}", i),
            Self::Int32(i) => write!(f, "{}", i),
            Self::Int64(i) => write!(f, "{}", i),
            Self::Float32(v) => write!(f, "{}", v),
            Self::Float64(v) => write!(f, "{}", v),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Char(c) => write!(f, "{}", c),
            Self::String(s)
            | Self::TsVector(s)
            | Self::TsQuery(s)
            | Self::RegConfig(s)
            | Self::LTree(s)
            | Self::Enum(s) => write!(f, "{}", s),
            Self::DateTime(dt) => write!(f, "{}", dt),
            Self::DateTimeUtc(dt) => write!(f, "{}", dt),
            Self::Date(d) => write!(f, "{}", d),
            Self::Time(t) => write!(f, "{}", t),
            Self::TimeTz(t) => write!(f, "{}", t),
            Self::Interval(i) => write!(f, "{}", i),
            Self::Uuid(u) => write!(f, "{}", u),
            Self::IpAddress(ip) => write!(f, "{}", ip),
            Self::IpNetwork(net) => write!(f, "{}", net),
            Self::BitString(bits) => write!(f, "{}", bits_to_string(bits)),
            Self::Range(range) => write!(f, "{}", range),
            Self::Json(_)
            | Self::Bytes(_)
            | Self::MacAddress(_)
            | Self::Dictionary(_)
            | Self::Array(_)
            | Self::Multirange(_)
            | Self::Tuple(_)
            | Self::Record(_) => write!(f, "{}", self.to_json()),
        }
    }
}

// ============================================================================
// Temporal and network helpers
// ============================================================================

/// Time of day with a UTC offset in seconds (east of UTC is positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTzValue {
    pub time: NaiveTime,
    pub offset_seconds: i32,
}

impl TimeTzValue {
    pub fn new(time: NaiveTime, offset_seconds: i32) -> Self {
        Self { time, offset_seconds }
    }
}

impl fmt::Display for TimeTzValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.offset_seconds < 0 { '-' } else { '+' };
        let abs = self.offset_seconds.unsigned_abs();
        let (hours, minutes, seconds) = (abs / 3600, (abs % 3600) / 60, abs % 60);
        write!(f, "{}{}{:02}", self.time.format("%H:%M:%S%.f"), sign, hours)?;
        if minutes != 0 || seconds != 0 {
            write!(f, ":{:02}", minutes)?;
        }
        if seconds != 0 {
            write!(f, ":{:02}", seconds)?;
        }
        Ok(())
    }
}

/// Interval with the same three components the database stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntervalValue {
    pub months: i32,
    pub days: i32,
    pub microseconds: i64,
}

impl IntervalValue {
    pub fn new(months: i32, days: i32, microseconds: i64) -> Self {
        Self { months, days, microseconds }
    }
}

impl fmt::Display for IntervalValue {
    /// ISO 8601 duration with designators, e.g. `P1Y2M3DT4H5M6.5S`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = self.months / 12;
        let months = self.months % 12;
        write!(f, "P")?;
        if years != 0 {
            write!(f, "{}Y", years)?;
        }
        if months != 0 {
            write!(f, "{}M", months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        let micros = self.microseconds;
        if micros != 0 || (years == 0 && months == 0 && self.days == 0) {
            let hours = micros / 3_600_000_000;
            let minutes = (micros % 3_600_000_000) / 60_000_000;
            let rem = micros % 60_000_000;
            write!(f, "T")?;
            if hours != 0 {
                write!(f, "{}H", hours)?;
            }
            if minutes != 0 {
                write!(f, "{}M", minutes)?;
            }
            if rem != 0 || (hours == 0 && minutes == 0) {
                let seconds = Decimal::new(rem, 6).normalize();
                write!(f, "{}S", seconds)?;
            }
        }
        Ok(())
    }
}

/// IP network: an address plus prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpNetworkValue {
    pub address: IpAddr,
    pub prefix: u8,
}

impl IpNetworkValue {
    pub fn new(address: IpAddr, prefix: u8) -> Self {
        Self { address, prefix }
    }
}

impl fmt::Display for IpNetworkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

// ============================================================================
// Ranges
// ============================================================================

/// One side of a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangeBound {
    /// No bound on this side
    Infinite,
    /// Bound value included in the range
    Inclusive(Box<HostValue>),
    /// Bound value excluded from the range
    Exclusive(Box<HostValue>),
}

impl RangeBound {
    /// Create an inclusive bound
    pub fn inclusive(value: HostValue) -> Self {
        Self::Inclusive(Box::new(value))
    }

    /// Create an exclusive bound
    pub fn exclusive(value: HostValue) -> Self {
        Self::Exclusive(Box::new(value))
    }

    /// Get the bound value (None if infinite)
    pub fn value(&self) -> Option<&HostValue> {
        match self {
            Self::Infinite => None,
            Self::Inclusive(v) | Self::Exclusive(v) => Some(v),
        }
    }

    /// Check if the bound value is included
    pub fn is_inclusive(&self) -> bool {
        matches!(self, Self::Inclusive(_))
    }

    /// Check if there is no bound on this side
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }
}

/// A range value
///
/// The shape is explicit: an empty range carries no bounds; otherwise each
/// side is infinite, inclusive or exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangeValue {
    /// The empty range
    Empty,
    /// A range with a lower and an upper side
    Bounds { lower: RangeBound, upper: RangeBound },
}

impl RangeValue {
    /// Create the empty range
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Create a range from its boundary facts (None = infinite)
    pub fn new(
        lower: Option<HostValue>,
        lower_inclusive: bool,
        upper: Option<HostValue>,
        upper_inclusive: bool,
    ) -> Self {
        let side = |value: Option<HostValue>, inclusive: bool| match value {
            None => RangeBound::Infinite,
            Some(v) if inclusive => RangeBound::inclusive(v),
            Some(v) => RangeBound::exclusive(v),
        };
        Self::Bounds {
            lower: side(lower, lower_inclusive),
            upper: side(upper, upper_inclusive),
        }
    }

    /// Create a closed range [lower, upper]
    pub fn closed(lower: HostValue, upper: HostValue) -> Self {
        Self::new(Some(lower), true, Some(upper), true)
    }

    /// Create a half-open range [lower, upper)
    pub fn closed_open(lower: HostValue, upper: HostValue) -> Self {
        Self::new(Some(lower), true, Some(upper), false)
    }

    /// Create an open range (lower, upper)
    pub fn open(lower: HostValue, upper: HostValue) -> Self {
        Self::new(Some(lower), false, Some(upper), false)
    }

    /// Create a range unbounded on both sides
    pub fn unbounded() -> Self {
        Self::new(None, false, None, false)
    }

    /// Check if this is the empty range
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Get the lower bound value (None if empty or infinite)
    pub fn lower(&self) -> Option<&HostValue> {
        match self {
            Self::Empty => None,
            Self::Bounds { lower, .. } => lower.value(),
        }
    }

    /// Get the upper bound value (None if empty or infinite)
    pub fn upper(&self) -> Option<&HostValue> {
        match self {
            Self::Empty => None,
            Self::Bounds { upper, .. } => upper.value(),
        }
    }

    pub fn lower_inclusive(&self) -> bool {
        matches!(self, Self::Bounds { lower, .. } if lower.is_inclusive())
    }

    pub fn upper_inclusive(&self) -> bool {
        matches!(self, Self::Bounds { upper, .. } if upper.is_inclusive())
    }

    pub fn lower_infinite(&self) -> bool {
        matches!(self, Self::Bounds { lower: RangeBound::Infinite, .. })
    }

    pub fn upper_infinite(&self) -> bool {
        matches!(self, Self::Bounds { upper: RangeBound::Infinite, .. })
    }

    /// Host type of the bound values, when at least one bound is present
    pub fn subtype(&self) -> Option<HostType> {
        self.lower()
            .and_then(HostValue::host_type)
            .or_else(|| self.upper().and_then(HostValue::host_type))
    }
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Bounds { lower, upper } => {
                write!(f, "{}", if lower.is_inclusive() { '[' } else { '(' })?;
                if let Some(v) = lower.value() {
                    write!(f, "{}", v)?;
                }
                write!(f, ",")?;
                if let Some(v) = upper.value() {
                    write!(f, "{}", v)?;
                }
                write!(f, "{}", if upper.is_inclusive() { ']' } else { ')' })
            }
        }
    }
}

/// Check if a multirange is non-empty (at least one contained range is non-empty)
pub fn multirange_is_non_empty(ranges: &[RangeValue]) -> bool {
    ranges.iter().any(|r| !r.is_empty())
}
