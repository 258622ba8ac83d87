//! Full-text search translations
//!
//! Translates the tsvector / tsquery constructors and functions (to_tsvector,
//! the *to_tsquery family, setweight, ts_rank, ts_headline, ts_rewrite and
//! friends) and the text search operators (@@, &&, ||, !!, @>, <@).
//!
//! Configuration arguments become `regconfig` constants when constant, pass
//! through when already typed as `regconfig`, and are cast otherwise.

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator, UnaryOperator};
use kingbase_sql_types::{HostType, HostValue};

use super::{constant_str, predicate};
use crate::{Domain, Operation, Translator};

/// Functions taking an optional leading configuration: (operation, function, result)
const CONFIGURABLE: &[(&str, &str, HostType)] = &[
    ("ToTsVector", "to_tsvector", HostType::TsVector),
    ("PlainToTsQuery", "plainto_tsquery", HostType::TsQuery),
    ("PhraseToTsQuery", "phraseto_tsquery", HostType::TsQuery),
    ("ToTsQuery", "to_tsquery", HostType::TsQuery),
    ("WebSearchToTsQuery", "websearch_to_tsquery", HostType::TsQuery),
    ("Unaccent", "unaccent", HostType::String),
];

/// Plain argument passthrough: (operation, function, result)
const PASSTHROUGH: &[(&str, &str, HostType)] = &[
    ("ArrayToTsVector", "array_to_tsvector", HostType::TsVector),
    ("SetWeight", "setweight", HostType::TsVector),
    ("Rank", "ts_rank", HostType::Float32),
    ("RankCoverDensity", "ts_rank_cd", HostType::Float32),
    ("Rewrite", "ts_rewrite", HostType::TsQuery),
    ("GetNodeCount", "numnode", HostType::Int32),
    ("GetQueryTree", "querytree", HostType::String),
    ("Strip", "strip", HostType::TsVector),
    ("GetLength", "length", HostType::Int32),
    ("Delete", "ts_delete", HostType::TsVector),
    ("Filter", "ts_filter", HostType::TsVector),
    ("ToPhrase", "tsquery_phrase", HostType::TsQuery),
];

pub struct FullTextSearchTranslator {
    factory: SqlExpressionFactory,
}

impl FullTextSearchTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    fn call(&self, function: &str, args: Vec<SqlExpression>, host_type: HostType) -> Result<SqlExpression> {
        let flags = vec![true; args.len()];
        self.factory.function(function, args, &flags, host_type, None)
    }

    /// Type a configuration argument as `regconfig`
    fn config_argument(&self, config: &SqlExpression) -> Result<SqlExpression> {
        if let Some(name) = constant_str(config) {
            return self
                .factory
                .typed_constant(HostValue::RegConfig(name.to_string()), "regconfig");
        }
        if config.store_type() == Some("regconfig") {
            return Ok(config.clone());
        }
        self.factory.cast_to_store_type(config.clone(), "regconfig")
    }

    fn matches(&self, left: &SqlExpression, right: &SqlExpression) -> Result<SqlExpression> {
        let right = if *right.host_type() == HostType::String {
            self.call("plainto_tsquery", vec![right.clone()], HostType::TsQuery)?
        } else {
            right.clone()
        };
        predicate(&self.factory, SqlOperator::TextSearchMatch, left, &right)
    }

    fn query_operator(&self, op: SqlOperator, left: &SqlExpression, right: &SqlExpression) -> Result<SqlExpression> {
        self.factory.binary(
            op,
            left.clone(),
            right.clone(),
            &[true, true],
            left.host_type().clone(),
            left.type_mapping().cloned(),
        )
    }
}

impl Translator for FullTextSearchTranslator {
    fn name(&self) -> &'static str {
        "full-text-search"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::FullTextSearch || args.is_empty() {
            return Ok(None);
        }
        let name = operation.name();

        if let Some((_, function, result)) = CONFIGURABLE.iter().find(|(n, _, _)| *n == name) {
            let args = match args {
                [text] => vec![text.clone()],
                [config, text] => vec![self.config_argument(config)?, text.clone()],
                _ => return Ok(None),
            };
            return self.call(function, args, result.clone()).map(Some);
        }
        if let Some((_, function, result)) = PASSTHROUGH.iter().find(|(n, _, _)| *n == name) {
            return self.call(function, args.to_vec(), result.clone()).map(Some);
        }

        let expression = match (name, args) {
            // ts_headline([config,] document, query [, options]); the query is the instance
            ("GetResultHeadline", [query, document]) => {
                self.call("ts_headline", vec![document.clone(), query.clone()], HostType::String)?
            }
            ("GetResultHeadline", [query, document, options]) => self.call(
                "ts_headline",
                vec![document.clone(), query.clone(), options.clone()],
                HostType::String,
            )?,
            ("GetResultHeadline", [query, config, document, options]) => self.call(
                "ts_headline",
                vec![self.config_argument(config)?, document.clone(), query.clone(), options.clone()],
                HostType::String,
            )?,
            ("Matches", [left, right]) => self.matches(left, right)?,
            ("And", [left, right]) => self.query_operator(SqlOperator::Overlaps, left, right)?,
            ("Or" | "Concat", [left, right]) => self.query_operator(SqlOperator::Concat, left, right)?,
            ("ToNegative", [query]) => self.factory.unary(
                UnaryOperator::TextSearchNegate,
                query.clone(),
                &[true],
                HostType::TsQuery,
                query.type_mapping().cloned(),
            )?,
            ("Contains", [left, right]) => predicate(&self.factory, SqlOperator::Contains, left, right)?,
            ("IsContainedIn", [left, right]) => predicate(&self.factory, SqlOperator::ContainedBy, left, right)?,
            _ => return Ok(None),
        };
        Ok(Some(expression))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingbase_sql_mapping::TypeMappingRegistry;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn translator() -> FullTextSearchTranslator {
        FullTextSearchTranslator::new(SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default())))
    }

    fn text_column(name: &str) -> SqlExpression {
        SqlExpression::column(None, name, false, HostType::String, None)
    }

    #[test]
    fn test_constant_config_becomes_regconfig() {
        let t = translator();
        let config = t.factory.constant(HostValue::string("english"));
        let result = t
            .translate(
                &Operation::method(Domain::FullTextSearch, "ToTsVector", 2),
                &[config, text_column("body")],
            )
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "to_tsvector('english'::regconfig, body)");
        assert_eq!(result.propagates_null(), &[true, true]);
    }

    #[test]
    fn test_non_constant_config_is_cast() {
        let t = translator();
        let result = t
            .translate(
                &Operation::method(Domain::FullTextSearch, "PlainToTsQuery", 2),
                &[text_column("lang"), text_column("q")],
            )
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "plainto_tsquery(lang::regconfig, q)");
    }

    #[test]
    fn test_matches_string_query() {
        let t = translator();
        let vector = SqlExpression::column(None, "search", false, HostType::TsVector, None);
        let result = t
            .translate(
                &Operation::method(Domain::FullTextSearch, "Matches", 2),
                &[vector, text_column("q")],
            )
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "search @@ plainto_tsquery(q)");
        assert_eq!(result.host_type(), &HostType::Bool);
    }

    #[test]
    fn test_rank_is_real() {
        let t = translator();
        let vector = SqlExpression::column(None, "search", false, HostType::TsVector, None);
        let query = SqlExpression::column(None, "query", false, HostType::TsQuery, None);
        let result = t
            .translate(&Operation::method(Domain::FullTextSearch, "Rank", 2), &[vector, query])
            .unwrap()
            .unwrap();
        assert_eq!(result.store_type(), Some("real"));
    }
}
