//! Operation identifiers

use std::fmt;

/// Capability domain qualifying an operation name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Array,
    List,
    Range,
    Multirange,
    Json,
    Network,
    FullTextSearch,
    Trigram,
    FuzzyStringMatch,
    Regex,
    Bytes,
    Aggregate,
    RowValue,
}

impl Domain {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Array => "Array",
            Self::List => "List",
            Self::Range => "Range",
            Self::Multirange => "Multirange",
            Self::Json => "Json",
            Self::Network => "Network",
            Self::FullTextSearch => "FullTextSearch",
            Self::Trigram => "Trigram",
            Self::FuzzyStringMatch => "FuzzyStringMatch",
            Self::Regex => "Regex",
            Self::Bytes => "Bytes",
            Self::Aggregate => "Aggregate",
            Self::RowValue => "RowValue",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an operation is a call or a property access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Method,
    Member,
}

/// A host-side operation awaiting translation
///
/// The arity counts every operand handed to the translator, including the
/// instance an instance method is called on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    domain: Domain,
    name: String,
    arity: usize,
    kind: OperationKind,
}

impl Operation {
    /// Create a method operation
    pub fn method(domain: Domain, name: impl Into<String>, arity: usize) -> Self {
        Self {
            domain,
            name: name.into(),
            arity,
            kind: OperationKind::Method,
        }
    }

    /// Create a member access operation over a single instance
    pub fn member(domain: Domain, name: impl Into<String>) -> Self {
        Self {
            domain,
            name: name.into(),
            arity: 1,
            kind: OperationKind::Member,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Check if this operation belongs to any of `domains`
    pub fn in_domain(&self, domains: &[Domain]) -> bool {
        domains.contains(&self.domain)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OperationKind::Method => write!(f, "{}.{}/{}", self.domain, self.name, self.arity),
            OperationKind::Member => write!(f, "{}.{}", self.domain, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Operation::method(Domain::Array, "Contains", 2).to_string(), "Array.Contains/2");
        assert_eq!(Operation::member(Domain::Range, "LowerBound").to_string(), "Range.LowerBound");
    }
}
