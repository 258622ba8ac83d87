//! Specialized translators
//!
//! One translator per capability domain:
//! - Arrays and lists (cardinality, ANY, containment)
//! - Ranges and multiranges (containment, bounds, range aggregates)
//! - JSON documents (property access, existence, containment)
//! - Network addresses (containment, bitwise operators, inet functions)
//! - Full-text search (tsvector / tsquery functions and operators)
//! - Trigrams and fuzzy string matching
//! - Regular expressions
//! - Byte sequences
//! - Statistics and miscellaneous aggregates
//! - Row value comparisons

mod aggregate;
mod array;
mod bytes;
mod full_text_search;
mod fuzzy;
mod json;
mod network;
mod range;
mod regex_match;
mod row_value;
mod statistics;
mod trigram;

pub use aggregate::MiscAggregateTranslator;
pub use array::ArrayTranslator;
pub use bytes::ByteSequenceTranslator;
pub use full_text_search::FullTextSearchTranslator;
pub use fuzzy::FuzzyStringMatchTranslator;
pub use json::JsonTranslator;
pub use network::NetworkTranslator;
pub use range::RangeTranslator;
pub use regex_match::{RegexOptions, RegexTranslator};
pub use row_value::RowValueTranslator;
pub use statistics::StatisticsAggregateTranslator;
pub use trigram::TrigramTranslator;

use kingbase_sql_diagnostics::{ErrorBuilder, KB0105, KbError, Result};
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator};
use kingbase_sql_types::{HostType, HostValue};

/// String value of a constant operand
pub(crate) fn constant_str(expression: &SqlExpression) -> Option<&str> {
    match expression.constant_value()? {
        HostValue::String(s) => Some(s),
        _ => None,
    }
}

/// Integer value of a constant operand
pub(crate) fn constant_int(expression: &SqlExpression) -> Option<i64> {
    match expression.constant_value()? {
        HostValue::Int16(i) => Some(i64::from(*i)),
        HostValue::Int32(i) => Some(i64::from(*i)),
        HostValue::Int64(i) => Some(*i),
        _ => None,
    }
}

/// Add `delta` to an integer expression, folding constants
pub(crate) fn offset(
    factory: &SqlExpressionFactory,
    expression: SqlExpression,
    delta: i32,
) -> Result<SqlExpression> {
    let folded = match expression.constant_value() {
        Some(HostValue::Int32(i)) => i.checked_add(delta),
        _ => None,
    };
    if let Some(folded) = folded {
        return Ok(factory.constant(HostValue::Int32(folded)));
    }
    let (op, amount) = if delta < 0 {
        (SqlOperator::Subtract, -delta)
    } else {
        (SqlOperator::Add, delta)
    };
    let host_type = expression.host_type().clone();
    factory.binary(
        op,
        expression,
        factory.constant(HostValue::Int32(amount)),
        &[true, true],
        host_type,
        None,
    )
}

/// Binary operator yielding a boolean, propagating nulls from both sides
pub(crate) fn predicate(
    factory: &SqlExpressionFactory,
    op: SqlOperator,
    left: &SqlExpression,
    right: &SqlExpression,
) -> Result<SqlExpression> {
    factory.binary(op, left.clone(), right.clone(), &[true, true], HostType::Bool, None)
}

/// Error for an operand whose shape does not fit an owned operation
pub(crate) fn shape_error(subject: impl Into<String>, message: impl Into<String>) -> KbError {
    ErrorBuilder::new(KB0105, message).subject(subject).translation()
}

/// Split a two-element tuple (row value or tuple constant) into its parts
pub(crate) fn unpack_pair(
    factory: &SqlExpressionFactory,
    expression: &SqlExpression,
) -> Option<(SqlExpression, SqlExpression)> {
    if expression.is_row_value() {
        return match expression.operands() {
            [first, second] => Some((first.clone(), second.clone())),
            _ => None,
        };
    }
    match expression.constant_value()? {
        HostValue::Tuple(values) => match values.as_slice() {
            [first, second] => Some((factory.constant(first.clone()), factory.constant(second.clone()))),
            _ => None,
        },
        _ => None,
    }
}
