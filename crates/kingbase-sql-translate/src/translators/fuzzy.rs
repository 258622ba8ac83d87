//! Fuzzy string match translations (fuzzystrmatch)

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory};
use kingbase_sql_types::HostType;

use crate::{Domain, Operation, Translator};

/// (operation, function, accepted argument counts, result)
const FUNCTIONS: &[(&str, &str, &[usize], HostType)] = &[
    ("FuzzyStringMatchSoundex", "soundex", &[1], HostType::String),
    ("FuzzyStringMatchDifference", "difference", &[2], HostType::Int32),
    ("FuzzyStringMatchLevenshtein", "levenshtein", &[2, 5], HostType::Int32),
    (
        "FuzzyStringMatchLevenshteinLessEqual",
        "levenshtein_less_equal",
        &[3, 6],
        HostType::Int32,
    ),
    ("FuzzyStringMatchMetaphone", "metaphone", &[2], HostType::String),
    ("FuzzyStringMatchDoubleMetaphone", "dmetaphone", &[1], HostType::String),
    ("FuzzyStringMatchDoubleMetaphoneAlt", "dmetaphone_alt", &[1], HostType::String),
];

pub struct FuzzyStringMatchTranslator {
    factory: SqlExpressionFactory,
}

impl FuzzyStringMatchTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }
}

impl Translator for FuzzyStringMatchTranslator {
    fn name(&self) -> &'static str {
        "fuzzy-string-match"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::FuzzyStringMatch {
            return Ok(None);
        }
        let Some((_, function, _, result)) = FUNCTIONS
            .iter()
            .find(|(name, _, counts, _)| *name == operation.name() && counts.contains(&args.len()))
        else {
            return Ok(None);
        };
        let flags = vec![true; args.len()];
        self.factory
            .function(function, args.to_vec(), &flags, result.clone(), None)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingbase_sql_mapping::TypeMappingRegistry;
    use kingbase_sql_types::HostValue;
    use std::sync::Arc;

    #[test]
    fn test_levenshtein_arities() {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let t = FuzzyStringMatchTranslator::new(factory.clone());
        let s = |v: &str| factory.constant(HostValue::string(v));

        let two = t
            .translate(
                &Operation::method(Domain::FuzzyStringMatch, "FuzzyStringMatchLevenshtein", 2),
                &[s("kitten"), s("sitting")],
            )
            .unwrap()
            .unwrap();
        assert_eq!(two.to_string(), "levenshtein('kitten', 'sitting')");

        let three = t
            .translate(
                &Operation::method(Domain::FuzzyStringMatch, "FuzzyStringMatchLevenshtein", 3),
                &[s("a"), s("b"), s("c")],
            )
            .unwrap();
        assert!(three.is_none());
    }
}
