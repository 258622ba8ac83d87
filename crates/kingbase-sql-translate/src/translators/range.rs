//! Range and multirange translations
//!
//! Translates: Contains, ContainedBy, Overlaps, IsStrictlyLeftOf,
//! IsStrictlyRightOf, DoesNotExtendLeftOf, DoesNotExtendRightOf,
//! IsAdjacentTo, Union, Intersect, Except, Merge, the bound members
//! (LowerBound, UpperBound, IsEmpty, LowerBoundIsInclusive,
//! UpperBoundIsInclusive, LowerBoundInfinite, UpperBoundInfinite),
//! multirange Any, and the RangeAgg / RangeIntersectAgg aggregates.

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator, UnaryOperator};
use kingbase_sql_mapping::TypeMapping;
use kingbase_sql_types::HostType;
use std::sync::Arc;

use super::predicate;
use crate::{Domain, Operation, Translator};

pub struct RangeTranslator {
    factory: SqlExpressionFactory,
}

fn predicate_operator(name: &str) -> Option<SqlOperator> {
    let op = match name {
        "Contains" => SqlOperator::Contains,
        "ContainedBy" => SqlOperator::ContainedBy,
        "Overlaps" => SqlOperator::Overlaps,
        "IsStrictlyLeftOf" => SqlOperator::StrictlyLeftOf,
        "IsStrictlyRightOf" => SqlOperator::StrictlyRightOf,
        "DoesNotExtendLeftOf" => SqlOperator::DoesNotExtendLeftOf,
        "DoesNotExtendRightOf" => SqlOperator::DoesNotExtendRightOf,
        "IsAdjacentTo" => SqlOperator::IsAdjacentTo,
        _ => return None,
    };
    Some(op)
}

fn set_operator(name: &str) -> Option<SqlOperator> {
    match name {
        "Union" => Some(SqlOperator::Add),
        "Intersect" => Some(SqlOperator::Multiply),
        "Except" => Some(SqlOperator::Subtract),
        _ => None,
    }
}

fn boolean_member(name: &str) -> Option<&'static str> {
    match name {
        "IsEmpty" => Some("isempty"),
        "LowerBoundIsInclusive" => Some("lower_inc"),
        "UpperBoundIsInclusive" => Some("upper_inc"),
        "LowerBoundInfinite" => Some("lower_inf"),
        "UpperBoundInfinite" => Some("upper_inf"),
        _ => None,
    }
}

impl RangeTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    fn subtype_mapping(range: &SqlExpression) -> Option<Arc<TypeMapping>> {
        range.type_mapping().and_then(|m| m.subtype().cloned())
    }

    /// Range mapping of a range or multirange operand
    fn range_mapping(&self, range: &SqlExpression) -> Option<Arc<TypeMapping>> {
        let mapping = range.type_mapping()?;
        if mapping.is_multirange() {
            mapping.range_mapping().cloned()
        } else if mapping.is_range() {
            Some(mapping.clone())
        } else {
            None
        }
    }

    fn multirange_mapping(&self, range: &SqlExpression) -> Option<Arc<TypeMapping>> {
        let subtype = Self::subtype_mapping(range)?;
        self.factory.registry().find_multirange_mapping(&subtype)
    }

    /// Operand typed with the range's subtype when it is an unmapped element
    fn element_typed(&self, range: &SqlExpression, other: &SqlExpression) -> SqlExpression {
        match Self::subtype_mapping(range) {
            Some(subtype) => self.factory.apply_type_mapping(other.clone(), &subtype),
            None => other.clone(),
        }
    }

    fn bound(&self, name: &str, range: &SqlExpression) -> Result<SqlExpression> {
        let subtype = range.host_type().range_subtype().cloned().unwrap_or(HostType::String);
        self.factory.function(
            name,
            vec![range.clone()],
            &[true],
            subtype,
            Self::subtype_mapping(range),
        )
    }

    fn aggregate(&self, name: &str, range: &SqlExpression) -> Result<Option<SqlExpression>> {
        let Some(subtype) = range.host_type().range_subtype().cloned() else {
            return Ok(None);
        };
        let multirange_result = name == "range_agg" || range.host_type().is_multirange();
        let (host_type, mapping) = if multirange_result {
            (HostType::multirange(subtype), self.multirange_mapping(range))
        } else {
            (HostType::range(subtype), self.range_mapping(range))
        };
        self.factory
            .aggregate_function(name, vec![range.clone()], &[false], host_type, mapping)
            .map(Some)
    }
}

impl Translator for RangeTranslator {
    fn name(&self) -> &'static str {
        "range"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if !operation.in_domain(&[Domain::Range, Domain::Multirange]) {
            return Ok(None);
        }
        let Some(range) = args.first() else {
            return Ok(None);
        };
        let is_multirange = range.host_type().is_multirange();
        if !range.host_type().is_range() && !is_multirange {
            return Ok(None);
        }
        let f = &self.factory;
        let name = operation.name();

        if let ([range, other], Some(op)) = (args, predicate_operator(name)) {
            return predicate(f, op, range, &self.element_typed(range, other)).map(Some);
        }
        if let ([range, other], Some(op)) = (args, set_operator(name)) {
            return f
                .binary(
                    op,
                    range.clone(),
                    other.clone(),
                    &[true, true],
                    range.host_type().clone(),
                    range.type_mapping().cloned(),
                )
                .map(Some);
        }
        if let ([range], Some(function)) = (args, boolean_member(name)) {
            return f
                .function(function, vec![range.clone()], &[true], HostType::Bool, None)
                .map(Some);
        }

        let expression = match (name, args) {
            ("Merge", [range, other]) if !is_multirange => f.function(
                "range_merge",
                vec![range.clone(), other.clone()],
                &[true, true],
                range.host_type().clone(),
                range.type_mapping().cloned(),
            )?,
            ("Merge", [range]) if is_multirange => {
                let subtype = range.host_type().range_subtype().cloned().unwrap_or(HostType::String);
                f.function(
                    "range_merge",
                    vec![range.clone()],
                    &[true],
                    HostType::range(subtype),
                    self.range_mapping(range),
                )?
            }
            ("LowerBound", [range]) if !is_multirange => self.bound("lower", range)?,
            ("UpperBound", [range]) if !is_multirange => self.bound("upper", range)?,
            ("Any", [range]) if is_multirange => {
                let is_empty = f.function("isempty", vec![range.clone()], &[true], HostType::Bool, None)?;
                f.unary(UnaryOperator::Not, is_empty, &[true], HostType::Bool, None)?
            }
            ("RangeAgg", [range]) => return self.aggregate("range_agg", range),
            ("RangeIntersectAgg", [range]) => return self.aggregate("range_intersect_agg", range),
            _ => return Ok(None),
        };
        Ok(Some(expression))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingbase_sql_mapping::TypeMappingRegistry;
    use kingbase_sql_types::HostValue;
    use pretty_assertions::assert_eq;

    fn setup() -> (RangeTranslator, SqlExpression) {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let mapping = factory.registry().find_mapping_for_store("int4range");
        let column = SqlExpression::column(None, "during", false, HostType::range(HostType::Int32), mapping);
        (RangeTranslator::new(factory), column)
    }

    #[test]
    fn test_contains_element() {
        let (translator, during) = setup();
        let element = SqlExpression::constant(HostValue::Int32(4), HostType::Int32, None);
        let result = translator
            .translate(&Operation::method(Domain::Range, "Contains", 2), &[during, element])
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "during @> 4");
        assert_eq!(result.operands()[1].store_type(), Some("integer"));
    }

    #[test]
    fn test_lower_bound_uses_subtype() {
        let (translator, during) = setup();
        let result = translator
            .translate(&Operation::member(Domain::Range, "LowerBound"), &[during])
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "lower(during)");
        assert_eq!(result.host_type(), &HostType::Int32);
        assert_eq!(result.store_type(), Some("integer"));
    }

    #[test]
    fn test_range_agg_yields_multirange() {
        let (translator, during) = setup();
        let result = translator
            .translate(&Operation::method(Domain::Range, "RangeAgg", 1), &[during])
            .unwrap()
            .unwrap();
        assert_eq!(result.store_type(), Some("int4multirange"));
        assert_eq!(result.propagates_null(), &[false]);
    }
}
