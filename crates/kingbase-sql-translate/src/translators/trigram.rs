//! Trigram similarity translations (pg_trgm)

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator};
use kingbase_sql_types::HostType;

use super::predicate;
use crate::{Domain, Operation, Translator};

pub struct TrigramTranslator {
    factory: SqlExpressionFactory,
}

fn similarity_function(name: &str) -> Option<&'static str> {
    match name {
        "TrigramsSimilarity" => Some("similarity"),
        "TrigramsWordSimilarity" => Some("word_similarity"),
        "TrigramsStrictWordSimilarity" => Some("strict_word_similarity"),
        _ => None,
    }
}

fn boolean_operator(name: &str) -> Option<SqlOperator> {
    match name {
        "TrigramsAreSimilar" => Some(SqlOperator::TrigramsAreSimilar),
        "TrigramsAreWordSimilar" => Some(SqlOperator::TrigramsAreWordSimilar),
        "TrigramsAreNotWordSimilar" => Some(SqlOperator::TrigramsAreNotWordSimilar),
        "TrigramsAreStrictWordSimilar" => Some(SqlOperator::TrigramsAreStrictWordSimilar),
        "TrigramsAreNotStrictWordSimilar" => Some(SqlOperator::TrigramsAreNotStrictWordSimilar),
        _ => None,
    }
}

fn distance_operator(name: &str) -> Option<SqlOperator> {
    match name {
        "TrigramsSimilarityDistance" => Some(SqlOperator::Distance),
        "TrigramsWordSimilarityDistance" => Some(SqlOperator::TrigramsWordSimilarityDistance),
        "TrigramsWordSimilarityDistanceInverted" => Some(SqlOperator::TrigramsWordSimilarityDistanceInverted),
        "TrigramsStrictWordSimilarityDistance" => Some(SqlOperator::TrigramsStrictWordSimilarityDistance),
        "TrigramsStrictWordSimilarityDistanceInverted" => {
            Some(SqlOperator::TrigramsStrictWordSimilarityDistanceInverted)
        }
        _ => None,
    }
}

impl TrigramTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }
}

impl Translator for TrigramTranslator {
    fn name(&self) -> &'static str {
        "trigram"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::Trigram {
            return Ok(None);
        }
        let name = operation.name();
        let f = &self.factory;

        let expression = match args {
            [text] if name == "TrigramsShow" => f.function(
                "show_trgm",
                vec![text.clone()],
                &[true],
                HostType::array(HostType::String),
                None,
            )?,
            [left, right] => {
                if let Some(function) = similarity_function(name) {
                    f.function(
                        function,
                        vec![left.clone(), right.clone()],
                        &[true, true],
                        HostType::Float32,
                        None,
                    )?
                } else if let Some(op) = boolean_operator(name) {
                    predicate(f, op, left, right)?
                } else if let Some(op) = distance_operator(name) {
                    f.binary(op, left.clone(), right.clone(), &[true, true], HostType::Float32, None)?
                } else {
                    return Ok(None);
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(expression))
    }
}
