//! Scalar literal rendering
//!
//! Every scalar store type has three textual forms:
//! - raw text, the value as the database prints it
//! - embedded text, raw text made safe inside an array or range literal
//! - top-level text, quoted and cast where the store type needs it

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use kingbase_sql_diagnostics::{ErrorBuilder, KB0200, KB0201, Result};
use kingbase_sql_types::{bits_to_string, HostType, HostValue, KingbaseDbType};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::MappingOptions;

/// Literal behaviour switches copied from [`MappingOptions`] into every descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiteralOptions {
    /// Accept non-UTC instants for `timestamp with time zone`
    pub legacy_timestamp_behavior: bool,
    /// Render minimum/maximum date-times as `-infinity`/`infinity`
    pub infinity_conversions: bool,
}

impl Default for LiteralOptions {
    fn default() -> Self {
        Self {
            legacy_timestamp_behavior: false,
            infinity_conversions: true,
        }
    }
}

impl From<&MappingOptions> for LiteralOptions {
    fn from(options: &MappingOptions) -> Self {
        Self {
            legacy_timestamp_behavior: options.legacy_timestamp_behavior,
            infinity_conversions: !options.disable_date_time_infinity_conversions,
        }
    }
}

/// Escape text for use inside a single-quoted SQL string
pub fn escape_sql(text: &str) -> String {
    text.replace('\'', "''")
}

/// Wrap text in single quotes, doubling embedded quotes
pub fn quote_sql(text: &str) -> String {
    format!("'{}'", escape_sql(text))
}

/// Wrap a container element in double quotes, escaping `"` and `\`
pub fn quote_element(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Check if a container element must be double-quoted
pub fn needs_element_quoting(text: &str) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case("null")
        || text.chars().any(|c| {
            matches!(c, '"' | '\\' | ',' | '(' | ')' | '[' | ']' | '{' | '}') || c.is_whitespace()
        })
}

/// How a store type's top-level literal is spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralClass {
    /// Unquoted (`5`, `TRUE`, `1.5`)
    Bare,
    /// Single-quoted, no cast (`'abc'`)
    Textual,
    /// Single-quoted and cast (`'2024-01-01'::date`)
    Quoted,
}

pub(crate) fn literal_class(db_type: &KingbaseDbType) -> LiteralClass {
    match db_type {
        KingbaseDbType::Boolean
        | KingbaseDbType::Smallint
        | KingbaseDbType::Integer
        | KingbaseDbType::Bigint
        | KingbaseDbType::Real
        | KingbaseDbType::Double
        | KingbaseDbType::Numeric => LiteralClass::Bare,
        KingbaseDbType::Text
        | KingbaseDbType::Varchar
        | KingbaseDbType::Char
        | KingbaseDbType::Json
        | KingbaseDbType::Jsonb => LiteralClass::Textual,
        _ => LiteralClass::Quoted,
    }
}

/// Store types whose embedded form is always double-quoted
fn always_quote_embedded(db_type: &KingbaseDbType) -> bool {
    matches!(
        db_type,
        KingbaseDbType::Text
            | KingbaseDbType::Varchar
            | KingbaseDbType::Char
            | KingbaseDbType::Citext
            | KingbaseDbType::Json
            | KingbaseDbType::Jsonb
    )
}

/// Scalar literal renderer bound to one store type
pub(crate) struct ScalarLiteral<'a> {
    pub store_type: &'a str,
    pub host_type: &'a HostType,
    pub db_type: &'a KingbaseDbType,
    pub options: LiteralOptions,
}

impl ScalarLiteral<'_> {
    fn mismatch(&self, value: &HostValue) -> kingbase_sql_diagnostics::KbError {
        ErrorBuilder::new(
            KB0200,
            format!("Cannot render {} as a literal of type {}", value, self.store_type),
        )
        .subject(self.store_type)
        .literal()
    }

    fn non_utc(&self, detail: impl Into<String>) -> kingbase_sql_diagnostics::KbError {
        ErrorBuilder::new(KB0201, detail)
            .subject(self.store_type)
            .context("Only UTC values are supported unless legacy timestamp behavior is enabled")
            .literal()
    }

    /// Raw text of a non-null value
    pub fn raw(&self, value: &HostValue) -> Result<String> {
        use KingbaseDbType as Db;

        let text = match (self.db_type, value) {
            (Db::Boolean, HostValue::Bool(b)) => b.to_string(),

            (Db::Smallint | Db::Integer | Db::Bigint | Db::Numeric, HostValue::Int16(i)) => {
                i.to_string()
            }
            (Db::Smallint | Db::Integer | Db::Bigint | Db::Numeric, HostValue::Int32(i)) => {
                i.to_string()
            }
            (Db::Smallint | Db::Integer | Db::Bigint | Db::Numeric, HostValue::Int64(i)) => {
                i.to_string()
            }
            (Db::Real | Db::Double, HostValue::Float32(v)) => float_text(f64::from(*v), format!("{:?}", v)),
            (Db::Real | Db::Double, HostValue::Float64(v)) => float_text(*v, format!("{:?}", v)),
            (Db::Numeric | Db::Money, HostValue::Decimal(d)) => d.to_string(),

            (Db::Text | Db::Varchar | Db::Char | Db::Citext, HostValue::String(s)) => s.clone(),
            (Db::Text | Db::Varchar | Db::Char | Db::Citext, HostValue::Char(c)) => c.to_string(),

            (Db::Bytea, HostValue::Bytes(bytes)) => {
                let mut hex = String::with_capacity(2 + bytes.len() * 2);
                hex.push_str("\\x");
                for b in bytes {
                    let _ = write!(hex, "{:02x}", b);
                }
                hex
            }

            (Db::Timestamp, HostValue::DateTime(dt)) => self.naive_date_time(dt),
            (Db::Timestamp, HostValue::DateTimeUtc(dt)) => {
                if !self.options.legacy_timestamp_behavior {
                    return Err(self.non_utc(format!(
                        "Cannot write an instant with an offset to {}",
                        self.store_type
                    )));
                }
                self.naive_date_time(&dt.naive_utc())
            }
            (Db::TimestampTz, HostValue::DateTimeUtc(dt)) => {
                if dt.offset().local_minus_utc() != 0 && !self.options.legacy_timestamp_behavior {
                    return Err(self.non_utc(format!(
                        "Cannot write a date-time with offset {} to {}",
                        dt.offset(),
                        self.store_type
                    )));
                }
                let utc = dt.with_timezone(&Utc);
                if let Some(infinity) = self.infinity_of(&utc.naive_utc()) {
                    infinity.to_string()
                } else {
                    format_utc(&utc)
                }
            }
            (Db::TimestampTz, HostValue::DateTime(dt)) => {
                if !self.options.legacy_timestamp_behavior {
                    return Err(self.non_utc(format!(
                        "Cannot write a date-time without an offset to {}",
                        self.store_type
                    )));
                }
                self.naive_date_time(dt)
            }
            (Db::Date, HostValue::Date(d)) => self.date(d),
            (Db::Time, HostValue::Time(t)) => t.format("%H:%M:%S%.f").to_string(),
            (Db::TimeTz, HostValue::TimeTz(t)) => t.to_string(),
            (Db::Interval, HostValue::Interval(i)) => i.to_string(),

            (Db::Uuid, HostValue::Uuid(u)) => u.to_string(),
            (Db::Inet, HostValue::IpAddress(ip)) => ip.to_string(),
            (Db::Inet | Db::Cidr, HostValue::IpNetwork(net)) => net.to_string(),
            (Db::MacAddr | Db::MacAddr8, HostValue::MacAddress(bytes)) => bytes
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":"),
            (Db::Bit | Db::Varbit, HostValue::BitString(bits)) => bits_to_string(bits),

            (Db::Json | Db::Jsonb, HostValue::String(s)) if *self.host_type == HostType::String => {
                s.clone()
            }
            (Db::Json | Db::Jsonb, other) => other.to_json().to_string(),

            (Db::TsVector, HostValue::TsVector(s) | HostValue::String(s))
            | (Db::TsQuery, HostValue::TsQuery(s) | HostValue::String(s))
            | (Db::RegConfig, HostValue::RegConfig(s) | HostValue::String(s))
            | (Db::LTree, HostValue::LTree(s) | HostValue::String(s)) => s.clone(),

            (Db::Hstore, HostValue::Dictionary(entries)) => entries
                .iter()
                .map(|(k, v)| match v {
                    Some(v) => format!("{}=>{}", quote_element(k), quote_element(v)),
                    None => format!("{}=>NULL", quote_element(k)),
                })
                .collect::<Vec<_>>()
                .join(", "),

            _ => return Err(self.mismatch(value)),
        };
        Ok(text)
    }

    /// Embedded (container-safe) text
    pub fn embedded(&self, value: &HostValue) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        let raw = self.raw(value)?;
        if always_quote_embedded(self.db_type) || needs_element_quoting(&raw) {
            Ok(quote_element(&raw))
        } else {
            Ok(raw)
        }
    }

    /// Top-level text, safe to splice into SQL
    pub fn toplevel(&self, value: &HostValue) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        let raw = self.raw(value)?;
        let text = match literal_class(self.db_type) {
            LiteralClass::Bare => match self.db_type {
                KingbaseDbType::Boolean => raw.to_ascii_uppercase(),
                _ if !is_finite_text(&raw) => format!("{}::{}", quote_sql(&raw), self.store_type),
                // `::` binds tighter than unary minus
                KingbaseDbType::Smallint | KingbaseDbType::Bigint | KingbaseDbType::Real
                    if raw.starts_with('-') =>
                {
                    format!("({})::{}", raw, self.store_type)
                }
                KingbaseDbType::Smallint | KingbaseDbType::Bigint | KingbaseDbType::Real => {
                    format!("{}::{}", raw, self.store_type)
                }
                _ => raw,
            },
            LiteralClass::Textual => quote_sql(&raw),
            LiteralClass::Quoted => format!("{}::{}", quote_sql(&raw), self.store_type),
        };
        Ok(text)
    }

    /// Element form inside an `ARRAY[...]` constructor, typed by the trailing array cast
    pub fn uncast(&self, value: &HostValue) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        let raw = self.raw(value)?;
        Ok(match literal_class(self.db_type) {
            LiteralClass::Bare if self.db_type == &KingbaseDbType::Boolean => {
                raw.to_ascii_uppercase()
            }
            LiteralClass::Bare if is_finite_text(&raw) => raw,
            _ => quote_sql(&raw),
        })
    }

    fn naive_date_time(&self, dt: &NaiveDateTime) -> String {
        self.infinity_of(dt)
            .map(str::to_string)
            .unwrap_or_else(|| dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }

    fn date(&self, d: &NaiveDate) -> String {
        if self.options.infinity_conversions {
            if *d == NaiveDate::MIN {
                return "-infinity".to_string();
            }
            if *d == NaiveDate::MAX {
                return "infinity".to_string();
            }
        }
        d.format("%Y-%m-%d").to_string()
    }

    fn infinity_of(&self, dt: &NaiveDateTime) -> Option<&'static str> {
        if !self.options.infinity_conversions {
            return None;
        }
        if *dt == NaiveDateTime::MIN {
            Some("-infinity")
        } else if *dt == NaiveDateTime::MAX {
            Some("infinity")
        } else {
            None
        }
    }
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.fZ").to_string()
}

fn float_text(v: f64, finite: String) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() && v > 0.0 {
        "Infinity".to_string()
    } else if v.is_infinite() {
        "-Infinity".to_string()
    } else {
        finite
    }
}

fn is_finite_text(raw: &str) -> bool {
    !matches!(raw, "NaN" | "Infinity" | "-Infinity")
}
