//! Row value comparisons
//!
//! `(a, b) > (x, y)` over two tuples of equal length. Tuple constants are
//! expanded into row values of constants.

use kingbase_sql_diagnostics::{ErrorBuilder, KB0102, Result};
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator};
use kingbase_sql_types::{HostType, HostValue};

use crate::{Domain, Operation, Translator};

fn comparison(name: &str) -> Option<SqlOperator> {
    let op = match name {
        "Equals" => SqlOperator::Equal,
        "NotEquals" => SqlOperator::NotEqual,
        "GreaterThan" => SqlOperator::GreaterThan,
        "GreaterThanOrEqual" => SqlOperator::GreaterThanOrEqual,
        "LessThan" => SqlOperator::LessThan,
        "LessThanOrEqual" => SqlOperator::LessThanOrEqual,
        _ => return None,
    };
    Some(op)
}

pub struct RowValueTranslator {
    factory: SqlExpressionFactory,
}

impl RowValueTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    fn as_row(&self, expression: &SqlExpression) -> Result<Option<SqlExpression>> {
        if expression.is_row_value() {
            return Ok(Some(expression.clone()));
        }
        let Some(HostValue::Tuple(values)) = expression.constant_value() else {
            return Ok(None);
        };
        let elements: Vec<_> = values.iter().map(|v| self.factory.constant(v.clone())).collect();
        let flags = vec![false; elements.len()];
        self.factory.row_value(elements, &flags).map(Some)
    }
}

impl Translator for RowValueTranslator {
    fn name(&self) -> &'static str {
        "row-value"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::RowValue {
            return Ok(None);
        }
        let (Some(op), [left, right]) = (comparison(operation.name()), args) else {
            return Ok(None);
        };
        let (Some(left), Some(right)) = (self.as_row(left)?, self.as_row(right)?) else {
            return Ok(None);
        };

        if left.operands().len() != right.operands().len() {
            return Err(ErrorBuilder::new(
                KB0102,
                format!(
                    "Row values have different lengths ({} and {})",
                    left.operands().len(),
                    right.operands().len()
                ),
            )
            .subject(operation.to_string())
            .translation());
        }

        self.factory
            .binary(op, left, right, &[false, false], HostType::Bool, None)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingbase_sql_mapping::TypeMappingRegistry;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn setup() -> (RowValueTranslator, SqlExpression) {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let row = factory
            .row_value(
                vec![
                    SqlExpression::column(None, "last_name", false, HostType::String, None),
                    SqlExpression::column(None, "id", false, HostType::Int32, None),
                ],
                &[false, false],
            )
            .unwrap();
        (RowValueTranslator::new(factory), row)
    }

    #[test]
    fn test_keyset_comparison() {
        let (t, row) = setup();
        let constant = SqlExpression::constant(
            HostValue::Tuple(vec![HostValue::string("Smith"), HostValue::Int32(10)]),
            HostType::tuple(vec![HostType::String, HostType::Int32]),
            None,
        );
        let result = t
            .translate(&Operation::method(Domain::RowValue, "GreaterThan", 2), &[row, constant])
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "(last_name, id) > ('Smith', 10)");
        assert_eq!(result.propagates_null(), &[false, false]);
    }

    #[test]
    fn test_length_mismatch() {
        let (t, row) = setup();
        let constant = SqlExpression::constant(
            HostValue::Tuple(vec![HostValue::string("Smith")]),
            HostType::tuple(vec![HostType::String]),
            None,
        );
        let err = t
            .translate(&Operation::method(Domain::RowValue, "Equals", 2), &[row, constant])
            .unwrap_err();
        assert_eq!(err.code(), KB0102);
    }
}
