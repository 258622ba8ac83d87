//! SQL operators

use std::fmt;

/// Binary SQL operator
///
/// Several KingbaseES operators share a symbol across type families
/// (`&&` is range overlap and tsquery conjunction); variants are named
/// after their primary meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlOperator {
    // === Comparison ===
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // === Logical ===
    And,
    Or,

    // === Arithmetic ===
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// `||` string, array, tsvector and tsquery concatenation
    Concat,

    // === Containment and ranges ===
    /// `@>`
    Contains,
    /// `<@`
    ContainedBy,
    /// `&&`
    Overlaps,
    /// `<<`
    StrictlyLeftOf,
    /// `>>`
    StrictlyRightOf,
    /// `&<`
    DoesNotExtendRightOf,
    /// `&>`
    DoesNotExtendLeftOf,
    /// `-|-`
    IsAdjacentTo,

    // === Network ===
    /// `<<=`
    ContainedByOrEqual,
    /// `>>=`
    ContainsOrEqual,

    // === Bitwise ===
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,

    // === Full-text search ===
    /// `@@`
    TextSearchMatch,

    // === Regular expressions ===
    /// `~`
    RegexMatch,
    /// `~*`
    RegexMatchCaseInsensitive,

    // === JSON ===
    /// `?`
    JsonExists,
    /// `?|`
    JsonExistsAny,
    /// `?&`
    JsonExistsAll,
    /// `->`
    JsonGet,
    /// `->>`
    JsonGetText,
    /// `#>`
    JsonGetPath,
    /// `#>>`
    JsonGetPathText,

    // === Trigrams ===
    /// `%`
    TrigramsAreSimilar,
    /// `<%`
    TrigramsAreWordSimilar,
    /// `%>`
    TrigramsAreNotWordSimilar,
    /// `<<%`
    TrigramsAreStrictWordSimilar,
    /// `%>>`
    TrigramsAreNotStrictWordSimilar,
    /// `<->`
    Distance,
    /// `<<->`
    TrigramsWordSimilarityDistance,
    /// `<->>`
    TrigramsWordSimilarityDistanceInverted,
    /// `<<<->`
    TrigramsStrictWordSimilarityDistance,
    /// `<->>>`
    TrigramsStrictWordSimilarityDistanceInverted,
}

impl SqlOperator {
    /// SQL spelling of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Concat => "||",
            Self::Contains => "@>",
            Self::ContainedBy => "<@",
            Self::Overlaps => "&&",
            Self::StrictlyLeftOf => "<<",
            Self::StrictlyRightOf => ">>",
            Self::DoesNotExtendRightOf => "&<",
            Self::DoesNotExtendLeftOf => "&>",
            Self::IsAdjacentTo => "-|-",
            Self::ContainedByOrEqual => "<<=",
            Self::ContainsOrEqual => ">>=",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "#",
            Self::TextSearchMatch => "@@",
            Self::RegexMatch => "~",
            Self::RegexMatchCaseInsensitive => "~*",
            Self::JsonExists => "?",
            Self::JsonExistsAny => "?|",
            Self::JsonExistsAll => "?&",
            Self::JsonGet => "->",
            Self::JsonGetText => "->>",
            Self::JsonGetPath => "#>",
            Self::JsonGetPathText => "#>>",
            Self::TrigramsAreSimilar => "%",
            Self::TrigramsAreWordSimilar => "<%",
            Self::TrigramsAreNotWordSimilar => "%>",
            Self::TrigramsAreStrictWordSimilar => "<<%",
            Self::TrigramsAreNotStrictWordSimilar => "%>>",
            Self::Distance => "<->",
            Self::TrigramsWordSimilarityDistance => "<<->",
            Self::TrigramsWordSimilarityDistanceInverted => "<->>",
            Self::TrigramsStrictWordSimilarityDistance => "<<<->",
            Self::TrigramsStrictWordSimilarityDistanceInverted => "<->>>",
        }
    }

    /// Check if this is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessThanOrEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
        )
    }
}

impl fmt::Display for SqlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary SQL operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Negate,
    /// `~` bitwise not (network addresses)
    BitwiseNot,
    /// `!!` tsquery negation
    TextSearchNegate,
    IsNull,
    IsNotNull,
}

impl UnaryOperator {
    /// SQL spelling of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::Negate => "-",
            Self::BitwiseNot => "~",
            Self::TextSearchNegate => "!!",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// Check if the operator is written after its operand
    pub fn is_postfix(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
