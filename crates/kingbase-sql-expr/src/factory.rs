//! Expression factory
//!
//! Builds composite expression nodes, validating the null-propagation flags
//! supplied by the caller and resolving result type mappings through the
//! registry when none is given.

use kingbase_sql_diagnostics::{ErrorBuilder, KB0001, KB0104, KB0105, KbError, Result};
use kingbase_sql_mapping::{TypeMapping, TypeMappingRegistry};
use kingbase_sql_types::{HostType, HostValue};
use log::debug;
use std::sync::Arc;

use crate::expression::{ExpressionKind, NullPropagation, SqlExpression};
use crate::{SqlOperator, UnaryOperator};

/// Factory for typed SQL expression nodes
#[derive(Debug, Clone)]
pub struct SqlExpressionFactory {
    registry: Arc<TypeMappingRegistry>,
}

impl SqlExpressionFactory {
    pub fn new(registry: Arc<TypeMappingRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeMappingRegistry {
        &self.registry
    }

    // === Leaves ===

    /// Create a constant, inferring host type and mapping from the value
    ///
    /// Values whose host type cannot be determined (nulls, empty containers)
    /// are typed as strings without a mapping.
    pub fn constant(&self, value: HostValue) -> SqlExpression {
        match value.host_type() {
            Some(host_type) => {
                let mapping = self.registry.find_mapping_for_host(&host_type);
                SqlExpression::constant(value, host_type, mapping)
            }
            None => SqlExpression::constant(value, HostType::String, None),
        }
    }

    /// Create a constant typed by an explicit mapping
    pub fn constant_with_mapping(&self, value: HostValue, mapping: Arc<TypeMapping>) -> SqlExpression {
        SqlExpression::constant(value, mapping.host_type().clone(), Some(mapping))
    }

    /// Create a constant typed by a store type name
    pub fn typed_constant(&self, value: HostValue, store_type: &str) -> Result<SqlExpression> {
        let mapping = self.registry.find_mapping_for_store(store_type).ok_or_else(|| {
            ErrorBuilder::new(KB0001, format!("No mapping for store type '{}'", store_type))
                .subject(store_type)
                .mapping()
        })?;
        Ok(self.constant_with_mapping(value, mapping))
    }

    // === Functions ===

    /// Create a function call
    pub fn function(
        &self,
        name: &str,
        args: Vec<SqlExpression>,
        propagates_null: &[bool],
        host_type: HostType,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<SqlExpression> {
        self.make_function(name, false, args, propagates_null, host_type, mapping)
    }

    /// Create an aggregate function call
    pub fn aggregate_function(
        &self,
        name: &str,
        args: Vec<SqlExpression>,
        propagates_null: &[bool],
        host_type: HostType,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<SqlExpression> {
        self.make_function(name, true, args, propagates_null, host_type, mapping)
    }

    fn make_function(
        &self,
        name: &str,
        aggregate: bool,
        args: Vec<SqlExpression>,
        propagates_null: &[bool],
        host_type: HostType,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<SqlExpression> {
        let propagates_null = check_propagation(name, &args, propagates_null)?;
        let mapping = mapping.or_else(|| self.infer_result_mapping(&host_type, &args));
        Ok(SqlExpression::composite(
            ExpressionKind::Function {
                name: name.to_string(),
                aggregate,
                nullable: true,
            },
            args,
            propagates_null,
            host_type,
            mapping,
        ))
    }

    // === Operators ===

    /// Create a binary operator node
    ///
    /// Leaf operands typed only by their host default receive the mapping
    /// shared with the other operand, so constants render with the column's
    /// store type.
    pub fn binary(
        &self,
        op: SqlOperator,
        left: SqlExpression,
        right: SqlExpression,
        propagates_null: &[bool],
        host_type: HostType,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<SqlExpression> {
        let (left, right) = match self.infer_shared_mapping(&left, &right) {
            Some(shared) => (
                self.apply_type_mapping(left, &shared),
                self.apply_type_mapping(right, &shared),
            ),
            None => (left, right),
        };
        let operands = vec![left, right];
        let propagates_null = check_propagation(op.symbol(), &operands, propagates_null)?;
        let mapping = mapping.or_else(|| self.infer_result_mapping(&host_type, &operands));
        Ok(SqlExpression::composite(
            ExpressionKind::Binary(op),
            operands,
            propagates_null,
            host_type,
            mapping,
        ))
    }

    /// Create a unary operator node
    pub fn unary(
        &self,
        op: UnaryOperator,
        operand: SqlExpression,
        propagates_null: &[bool],
        host_type: HostType,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<SqlExpression> {
        let operands = vec![operand];
        let propagates_null = check_propagation(op.symbol(), &operands, propagates_null)?;
        let mapping = mapping.or_else(|| self.infer_result_mapping(&host_type, &operands));
        Ok(SqlExpression::composite(
            ExpressionKind::Unary(op),
            operands,
            propagates_null,
            host_type,
            mapping,
        ))
    }

    /// Cast an operand to the given mapping's store type
    pub fn cast(
        &self,
        operand: SqlExpression,
        mapping: Arc<TypeMapping>,
        propagates_null: &[bool],
    ) -> Result<SqlExpression> {
        let operands = vec![operand];
        let propagates_null = check_propagation("CAST", &operands, propagates_null)?;
        Ok(SqlExpression::composite(
            ExpressionKind::Cast,
            operands,
            propagates_null,
            mapping.host_type().clone(),
            Some(mapping),
        ))
    }

    /// Cast an operand to a store type resolved by name
    pub fn cast_to_store_type(&self, operand: SqlExpression, store_type: &str) -> Result<SqlExpression> {
        let mapping = self.registry.find_mapping_for_store(store_type).ok_or_else(|| {
            ErrorBuilder::new(KB0001, format!("No mapping for store type '{}'", store_type))
                .subject(store_type)
                .mapping()
        })?;
        self.cast(operand, mapping, &[true])
    }

    // === Structural nodes ===

    /// Create a row value `(a, b, ...)`
    pub fn row_value(&self, operands: Vec<SqlExpression>, propagates_null: &[bool]) -> Result<SqlExpression> {
        if operands.is_empty() {
            return Err(ErrorBuilder::new(KB0105, "Row value requires at least one element")
                .subject("ROW")
                .translation());
        }
        let propagates_null = check_propagation("ROW", &operands, propagates_null)?;
        let host_type = HostType::tuple(operands.iter().map(|o| o.host_type().clone()).collect());
        Ok(SqlExpression::composite(
            ExpressionKind::RowValue,
            operands,
            propagates_null,
            host_type,
            None,
        ))
    }

    /// Create `array[index]`; `index` must already be one-based
    pub fn array_index(
        &self,
        array: SqlExpression,
        index: SqlExpression,
        propagates_null: &[bool],
    ) -> Result<SqlExpression> {
        let element_host = array
            .host_type()
            .sequence_element()
            .cloned()
            .ok_or_else(|| shape_error("[]", "Array index requires an array operand"))?;
        let mapping = array
            .type_mapping()
            .and_then(|m| m.element().cloned())
            .or_else(|| self.registry.find_mapping_for_host(&element_host));
        let operands = vec![array, index];
        let propagates_null = check_propagation("[]", &operands, propagates_null)?;
        Ok(SqlExpression::composite(
            ExpressionKind::ArrayIndex,
            operands,
            propagates_null,
            element_host,
            mapping,
        ))
    }

    /// Create `item op ANY (array)`
    pub fn array_any(
        &self,
        op: SqlOperator,
        item: SqlExpression,
        array: SqlExpression,
        propagates_null: &[bool],
    ) -> Result<SqlExpression> {
        let item = match array.type_mapping().and_then(|m| m.element()) {
            Some(element) => self.apply_type_mapping(item, element),
            None => item,
        };
        let operands = vec![item, array];
        let propagates_null = check_propagation("ANY", &operands, propagates_null)?;
        let mapping = self.registry.find_mapping_for_host(&HostType::Bool);
        Ok(SqlExpression::composite(
            ExpressionKind::ArrayAny(op),
            operands,
            propagates_null,
            HostType::Bool,
            mapping,
        ))
    }

    /// Create an `ARRAY[...]` constructor
    pub fn array_literal(
        &self,
        elements: Vec<SqlExpression>,
        element_type: HostType,
        propagates_null: &[bool],
    ) -> Result<SqlExpression> {
        let propagates_null = check_propagation("ARRAY", &elements, propagates_null)?;
        let host_type = HostType::array(element_type);
        let mapping = self.registry.find_mapping_for_host(&host_type);
        Ok(SqlExpression::composite(
            ExpressionKind::ArrayLiteral,
            elements,
            propagates_null,
            host_type,
            mapping,
        ))
    }

    /// Create `position(needle IN haystack)`
    pub fn position(
        &self,
        needle: SqlExpression,
        haystack: SqlExpression,
        propagates_null: &[bool],
    ) -> Result<SqlExpression> {
        let operands = vec![needle, haystack];
        let propagates_null = check_propagation("position", &operands, propagates_null)?;
        let mapping = self.registry.find_mapping_for_host(&HostType::Int32);
        Ok(SqlExpression::composite(
            ExpressionKind::Position,
            operands,
            propagates_null,
            HostType::Int32,
            mapping,
        ))
    }

    // === Mapping inference ===

    /// Pick the mapping two operands should share
    ///
    /// A mapping carrying facets wins over one without; the left operand wins
    /// ties. When neither operand is mapped, the registry is asked for the
    /// left operand's host type.
    pub fn infer_shared_mapping(
        &self,
        left: &SqlExpression,
        right: &SqlExpression,
    ) -> Option<Arc<TypeMapping>> {
        match (self.explicit_mapping(left), self.explicit_mapping(right)) {
            (Some(l), Some(r)) => {
                if l.facets().is_empty() && !r.facets().is_empty() {
                    Some(r.clone())
                } else {
                    Some(l.clone())
                }
            }
            (Some(l), None) => Some(l.clone()),
            (None, Some(r)) => Some(r.clone()),
            (None, None) => left
                .type_mapping()
                .or(right.type_mapping())
                .cloned()
                .or_else(|| self.registry.find_mapping_for_host(left.host_type())),
        }
    }

    /// Give a retypable leaf the provided mapping when the host types agree
    pub fn apply_type_mapping(&self, expression: SqlExpression, mapping: &Arc<TypeMapping>) -> SqlExpression {
        if self.is_retypable(&expression) && expression.host_type() == mapping.host_type() {
            expression.with_type_mapping(mapping.clone())
        } else {
            expression
        }
    }

    /// Constant or parameter that is unmapped or carries only its host default
    fn is_retypable(&self, expression: &SqlExpression) -> bool {
        if !matches!(
            expression.kind(),
            ExpressionKind::Constant(_) | ExpressionKind::Parameter(_)
        ) {
            return false;
        }
        match expression.type_mapping() {
            None => true,
            Some(current) => self
                .registry
                .find_mapping_for_host(expression.host_type())
                .is_some_and(|default| default.store_type() == current.store_type()),
        }
    }

    fn explicit_mapping<'e>(&self, expression: &'e SqlExpression) -> Option<&'e Arc<TypeMapping>> {
        if self.is_retypable(expression) {
            None
        } else {
            expression.type_mapping()
        }
    }

    fn infer_result_mapping(&self, host_type: &HostType, operands: &[SqlExpression]) -> Option<Arc<TypeMapping>> {
        let hinted = operands
            .iter()
            .filter_map(SqlExpression::type_mapping)
            .find(|m| m.host_type() == host_type);
        if let Some(mapping) = hinted {
            return Some(mapping.clone());
        }
        let mapping = self.registry.find_mapping_for_host(host_type);
        if mapping.is_none() {
            debug!("No result mapping for host type {}", host_type);
        }
        mapping
    }
}

fn check_propagation(
    subject: &str,
    operands: &[SqlExpression],
    propagates_null: &[bool],
) -> Result<NullPropagation> {
    if propagates_null.len() != operands.len() {
        return Err(ErrorBuilder::new(
            KB0104,
            format!(
                "Expected {} null-propagation flags, got {}",
                operands.len(),
                propagates_null.len()
            ),
        )
        .subject(subject)
        .translation());
    }
    Ok(NullPropagation::from_slice(propagates_null))
}

fn shape_error(subject: &str, message: &str) -> KbError {
    ErrorBuilder::new(KB0105, message).subject(subject).translation()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn factory() -> SqlExpressionFactory {
        SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()))
    }

    #[test]
    fn test_propagation_length_is_checked() {
        let f = factory();
        let arg = f.constant(HostValue::string("abc"));
        let err = f
            .function("upper", vec![arg], &[true, true], HostType::String, None)
            .unwrap_err();
        assert_eq!(err.code(), KB0104);
        assert_eq!(err.subject(), Some("upper"));
    }

    #[test]
    fn test_constant_infers_mapping() {
        let f = factory();
        let constant = f.constant(HostValue::Int32(5));
        assert_eq!(constant.store_type(), Some("integer"));
        assert_eq!(constant.to_string(), "5");

        let null = f.constant(HostValue::Null);
        assert!(null.type_mapping().is_none());
    }

    #[test]
    fn test_shared_mapping_prefers_facets() {
        let f = factory();
        let registry = f.registry();
        let varchar = registry
            .find_mapping_for_store("character varying(32)")
            .unwrap();
        let column = SqlExpression::column(Some("t"), "name", false, HostType::String, Some(varchar));
        let constant = SqlExpression::constant(HostValue::string("x"), HostType::String, None);

        let shared = f.infer_shared_mapping(&constant, &column).unwrap();
        assert_eq!(shared.store_type(), "character varying(32)");
    }

    #[test]
    fn test_default_typed_constant_takes_column_mapping() {
        let f = factory();
        let varchar = f.registry().find_mapping_for_store("varchar(32)").unwrap();
        let column = SqlExpression::column(Some("b"), "title", false, HostType::String, Some(varchar));
        let constant = f.constant(HostValue::string("O'Brien"));
        assert_eq!(constant.store_type(), Some("text"));

        let shared = f.infer_shared_mapping(&constant, &column).unwrap();
        assert_eq!(shared.store_type(), "varchar(32)");

        let eq = f
            .binary(SqlOperator::Equal, column, constant, &[true, true], HostType::Bool, None)
            .unwrap();
        assert_eq!(eq.operands()[1].store_type(), Some("varchar(32)"));
        assert_eq!(eq.to_string(), "b.title = 'O''Brien'");
    }

    #[test]
    fn test_explicitly_typed_constant_keeps_mapping() {
        let f = factory();
        let varchar = f.registry().find_mapping_for_store("varchar(32)").unwrap();
        let column = SqlExpression::column(Some("b"), "title", false, HostType::String, Some(varchar));
        let constant = f.typed_constant(HostValue::string("x"), "varchar(8)").unwrap();

        let eq = f
            .binary(SqlOperator::Equal, constant, column, &[true, true], HostType::Bool, None)
            .unwrap();
        assert_eq!(eq.operands()[0].store_type(), Some("varchar(8)"));
    }

    #[test]
    fn test_parameter_without_mapping() {
        let p = SqlExpression::parameter("p0", HostType::Int64, None);
        assert_eq!(p.to_string(), "@p0");
        assert!(p.is_well_formed());
    }
}
