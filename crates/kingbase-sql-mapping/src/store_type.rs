//! Store type name parsing
//!
//! Splits a raw store type such as `numeric(10,2)`, `varchar(32)[]` or
//! `timestamp(3) with time zone` into its base name and facets. Text after
//! the closing parenthesis is kept as part of the base name.

use winnow::ascii::{digit1, space0};
use winnow::combinator::{opt, preceded, terminated};
use winnow::prelude::*;

/// Store types whose single modifier is a precision rather than a size
const PRECISION_TYPES: &[&str] = &[
    "numeric",
    "decimal",
    "time",
    "timetz",
    "timestamp",
    "timestamptz",
    "interval",
    "float",
];

/// Store types holding character data
const CHARACTER_TYPES: &[&str] = &[
    "text",
    "citext",
    "character varying",
    "varchar",
    "character",
    "char",
    "bpchar",
];

/// Result of parsing a raw store type name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ParsedStoreType {
    /// Store type with the parenthesized modifier removed
    pub base_name: String,
    /// `Some(true)` for character types
    pub is_unicode: Option<bool>,
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl ParsedStoreType {
    fn bare(raw: &str) -> Self {
        Self {
            base_name: raw.to_string(),
            is_unicode: unicode_flag(raw),
            ..Self::default()
        }
    }

    /// Check if any modifier was present
    pub fn has_modifiers(&self) -> bool {
        self.size.is_some() || self.precision.is_some() || self.scale.is_some()
    }
}

/// Parse a raw store type name
///
/// Malformed parenthesization (no closing paren, non-numeric modifiers)
/// returns the raw name unchanged with no modifiers.
pub fn parse_store_type(raw: &str) -> ParsedStoreType {
    let Some(open) = raw.find('(') else {
        return ParsedStoreType::bare(raw);
    };
    let Some(close) = raw[open..].find(')').map(|i| open + i) else {
        return ParsedStoreType::bare(raw);
    };

    let pre = raw[..open].trim_end();
    let post = &raw[close + 1..];
    let Ok((first, second)) = modifiers.parse(&raw[open + 1..close]) else {
        return ParsedStoreType::bare(raw);
    };

    let base_name = format!("{}{}", pre, post);
    let mut parsed = ParsedStoreType {
        is_unicode: unicode_flag(&base_name),
        base_name,
        ..ParsedStoreType::default()
    };

    match second {
        Some(scale) => {
            parsed.precision = Some(first);
            parsed.scale = Some(scale);
        }
        None if uses_precision(pre) => parsed.precision = Some(first),
        None => parsed.size = Some(first),
    }
    parsed
}

/// `first[, second]` with optional surrounding whitespace; each number
/// consumes the whitespace that follows it
fn modifiers(input: &mut &str) -> ModalResult<(u32, Option<u32>)> {
    let first = preceded(space0, number).parse_next(input)?;
    let second = opt(preceded((',', space0), number)).parse_next(input)?;
    Ok((first, second))
}

fn number(input: &mut &str) -> ModalResult<u32> {
    terminated(digit1, space0)
        .try_map(str::parse::<u32>)
        .parse_next(input)
}

fn uses_precision(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    PRECISION_TYPES.contains(&name.as_str())
}

fn unicode_flag(name: &str) -> Option<bool> {
    let name = name.trim().trim_end_matches("[]").to_ascii_lowercase();
    CHARACTER_TYPES.contains(&name.as_str()).then_some(true)
}
