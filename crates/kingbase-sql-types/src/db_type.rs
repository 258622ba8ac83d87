//! Native type tags
//!
//! The tag is what the underlying database client uses to pick a wire format
//! for a parameter. Containers wrap the tag of their element or subtype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire type identifier understood by the KingbaseES client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KingbaseDbType {
    Boolean,
    Smallint,
    Integer,
    Bigint,
    Real,
    Double,
    Numeric,
    Money,
    Text,
    Varchar,
    Char,
    Citext,
    Bytea,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    TimeTz,
    Interval,
    Uuid,
    Inet,
    Cidr,
    MacAddr,
    MacAddr8,
    Bit,
    Varbit,
    Json,
    Jsonb,
    TsVector,
    TsQuery,
    RegConfig,
    Hstore,
    LTree,
    /// User enum; the client resolves it by store type name
    Enum,
    /// Type not known to the client; sent as text
    Unknown,
    /// Array of the wrapped element tag
    Array(Box<KingbaseDbType>),
    /// Range of the wrapped subtype tag
    Range(Box<KingbaseDbType>),
    /// Multirange of the wrapped subtype tag
    Multirange(Box<KingbaseDbType>),
}

impl KingbaseDbType {
    /// Create an array tag
    pub fn array(element: KingbaseDbType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Create a range tag
    pub fn range(subtype: KingbaseDbType) -> Self {
        Self::Range(Box::new(subtype))
    }

    /// Create a multirange tag
    pub fn multirange(subtype: KingbaseDbType) -> Self {
        Self::Multirange(Box::new(subtype))
    }

    /// Check if this is a container tag
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Range(_) | Self::Multirange(_))
    }
}

impl fmt::Display for KingbaseDbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(inner) => write!(f, "Array | {}", inner),
            Self::Range(inner) => write!(f, "Range | {}", inner),
            Self::Multirange(inner) => write!(f, "Multirange | {}", inner),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(KingbaseDbType::Integer.to_string(), "Integer");
        assert_eq!(
            KingbaseDbType::array(KingbaseDbType::range(KingbaseDbType::Date)).to_string(),
            "Array | Range | Date"
        );
        assert!(KingbaseDbType::multirange(KingbaseDbType::Numeric).is_container());
    }
}
