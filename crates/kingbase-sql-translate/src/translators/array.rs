//! Array and list translations
//!
//! Translates: Length, Count, ElementAt, First, Contains, IndexOf, Concat,
//! Append, Prepend, Remove, SequenceEqual, Any, Join, Overlaps, ContainsAll,
//! ContainedBy. The first operand is always the array.

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator};
use kingbase_sql_types::{HostType, HostValue};

use super::{offset, predicate};
use crate::{Domain, Operation, Translator};

pub struct ArrayTranslator {
    factory: SqlExpressionFactory,
}

impl ArrayTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    /// Give an unmapped item the array's element mapping
    fn element_typed(&self, array: &SqlExpression, item: &SqlExpression) -> SqlExpression {
        match array.type_mapping().and_then(|m| m.element()) {
            Some(element) => self.factory.apply_type_mapping(item.clone(), element),
            None => item.clone(),
        }
    }

    fn cardinality(&self, array: &SqlExpression) -> Result<SqlExpression> {
        self.factory
            .function("cardinality", vec![array.clone()], &[true], HostType::Int32, None)
    }

    fn index_of(&self, array: &SqlExpression, item: &SqlExpression) -> Result<SqlExpression> {
        let position = self.factory.function(
            "array_position",
            vec![array.clone(), self.element_typed(array, item)],
            &[true, false],
            HostType::Int32,
            None,
        )?;
        let zero_based = offset(&self.factory, position, -1)?;
        self.factory.function(
            "COALESCE",
            vec![zero_based, self.factory.constant(HostValue::Int32(-1))],
            &[false, false],
            HostType::Int32,
            None,
        )
    }

    fn same_type(
        &self,
        name: &str,
        args: Vec<SqlExpression>,
        propagates_null: &[bool],
        array: &SqlExpression,
    ) -> Result<SqlExpression> {
        self.factory.function(
            name,
            args,
            propagates_null,
            array.host_type().clone(),
            array.type_mapping().cloned(),
        )
    }
}

impl Translator for ArrayTranslator {
    fn name(&self) -> &'static str {
        "array"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if !operation.in_domain(&[Domain::Array, Domain::List]) {
            return Ok(None);
        }
        let Some(array) = args.first() else {
            return Ok(None);
        };
        if !array.host_type().is_sequence() {
            return Ok(None);
        }
        let f = &self.factory;

        let expression = match (operation.name(), args) {
            ("Length" | "Count", [array]) => self.cardinality(array)?,
            ("Any", [array]) => {
                let zero = f.constant(HostValue::Int32(0));
                predicate(f, SqlOperator::GreaterThan, &self.cardinality(array)?, &zero)?
            }
            ("First", [array]) => f.array_index(array.clone(), f.constant(HostValue::Int32(1)), &[true, true])?,
            ("ElementAt", [array, index]) => {
                let index = offset(f, index.clone(), 1)?;
                f.array_index(array.clone(), index, &[true, true])?
            }
            ("Contains", [array, item]) => {
                f.array_any(SqlOperator::Equal, item.clone(), array.clone(), &[true, true])?
            }
            ("IndexOf", [array, item]) => self.index_of(array, item)?,
            ("Concat", [array, other]) => f.binary(
                SqlOperator::Concat,
                array.clone(),
                other.clone(),
                &[false, false],
                array.host_type().clone(),
                array.type_mapping().cloned(),
            )?,
            ("Append", [array, item]) => self.same_type(
                "array_append",
                vec![array.clone(), self.element_typed(array, item)],
                &[false, false],
                array,
            )?,
            ("Prepend", [array, item]) => self.same_type(
                "array_prepend",
                vec![self.element_typed(array, item), array.clone()],
                &[false, false],
                array,
            )?,
            ("Remove", [array, item]) => self.same_type(
                "array_remove",
                vec![array.clone(), self.element_typed(array, item)],
                &[true, false],
                array,
            )?,
            ("SequenceEqual", [array, other]) => predicate(f, SqlOperator::Equal, array, other)?,
            ("Join", [array, separator]) => f.function(
                "array_to_string",
                vec![array.clone(), separator.clone()],
                &[true, true],
                HostType::String,
                None,
            )?,
            ("Overlaps", [array, other]) => predicate(f, SqlOperator::Overlaps, array, other)?,
            ("ContainsAll", [array, other]) => predicate(f, SqlOperator::Contains, array, other)?,
            ("ContainedBy", [array, other]) => predicate(f, SqlOperator::ContainedBy, array, other)?,
            _ => return Ok(None),
        };
        Ok(Some(expression))
    }
}
