//! Statistics aggregate translations
//!
//! Two-argument aggregates receive a single `(y, x)` tuple operand, which is
//! unpacked into positional arguments. Aggregates skip nulls, so no operand
//! propagates null.

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory};
use kingbase_sql_types::HostType;

use super::unpack_pair;
use crate::{Domain, Operation, Translator};

fn single_argument(name: &str) -> Option<&'static str> {
    match name {
        "StandardDeviationSample" => Some("stddev_samp"),
        "StandardDeviationPopulation" => Some("stddev_pop"),
        "VarianceSample" => Some("var_samp"),
        "VariancePopulation" => Some("var_pop"),
        _ => None,
    }
}

fn two_argument(name: &str) -> Option<(&'static str, HostType)> {
    let function = match name {
        "Correlation" => "corr",
        "CovariancePopulation" => "covar_pop",
        "CovarianceSample" => "covar_samp",
        "RegrAverageX" => "regr_avgx",
        "RegrAverageY" => "regr_avgy",
        "RegrCount" => return Some(("regr_count", HostType::Int64)),
        "RegrIntercept" => "regr_intercept",
        "RegrR2" => "regr_r2",
        "RegrSlope" => "regr_slope",
        "RegrSXX" => "regr_sxx",
        "RegrSXY" => "regr_sxy",
        "RegrSYY" => "regr_syy",
        _ => return None,
    };
    Some((function, HostType::Float64))
}

pub struct StatisticsAggregateTranslator {
    factory: SqlExpressionFactory,
}

impl StatisticsAggregateTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }
}

impl Translator for StatisticsAggregateTranslator {
    fn name(&self) -> &'static str {
        "statistics-aggregate"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::Aggregate {
            return Ok(None);
        }
        let name = operation.name();
        let f = &self.factory;

        if let (Some(function), [values]) = (single_argument(name), args) {
            if !values.host_type().is_numeric() {
                return Ok(None);
            }
            return f
                .aggregate_function(function, vec![values.clone()], &[false], HostType::Float64, None)
                .map(Some);
        }

        let Some((function, result)) = two_argument(name) else {
            return Ok(None);
        };
        let (y, x) = match args {
            [pair] => match unpack_pair(f, pair) {
                Some(pair) => pair,
                None => return Ok(None),
            },
            [y, x] => (y.clone(), x.clone()),
            _ => return Ok(None),
        };
        f.aggregate_function(function, vec![y, x], &[false, false], result, None)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingbase_sql_mapping::TypeMappingRegistry;
    use kingbase_sql_types::HostValue;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn column(name: &str) -> SqlExpression {
        SqlExpression::column(None, name, true, HostType::Float64, None)
    }

    #[test]
    fn test_pair_is_unpacked() {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let t = StatisticsAggregateTranslator::new(factory.clone());
        let pair = factory
            .row_value(vec![column("y"), column("x")], &[false, false])
            .unwrap();
        let result = t
            .translate(&Operation::method(Domain::Aggregate, "RegrCount", 1), &[pair])
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "regr_count(y, x)");
        assert_eq!(result.host_type(), &HostType::Int64);
        assert_eq!(result.propagates_null(), &[false, false]);
    }

    #[test]
    fn test_wrong_shape_is_declined() {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let t = StatisticsAggregateTranslator::new(factory.clone());
        let triple = factory.constant(HostValue::Tuple(vec![
            HostValue::Float64(1.0),
            HostValue::Float64(2.0),
            HostValue::Float64(3.0),
        ]));
        let result = t
            .translate(&Operation::method(Domain::Aggregate, "Correlation", 1), &[triple])
            .unwrap();
        assert!(result.is_none());
    }
}
