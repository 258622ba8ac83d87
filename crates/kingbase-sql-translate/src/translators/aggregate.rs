//! Miscellaneous aggregate translations
//!
//! Translates: StringJoin, ArrayAgg, JsonAgg, JsonbAgg, JsonObjectAgg,
//! JsonbObjectAgg.

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory};
use kingbase_sql_types::{HostType, HostValue};

use super::unpack_pair;
use crate::{Domain, Operation, Translator};

pub struct MiscAggregateTranslator {
    factory: SqlExpressionFactory,
}

impl MiscAggregateTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    fn json_aggregate(&self, function: &str, args: Vec<SqlExpression>, store_type: &str) -> Result<SqlExpression> {
        let flags = vec![false; args.len()];
        let mapping = self.factory.registry().find_mapping_for_store(store_type);
        self.factory
            .aggregate_function(function, args, &flags, HostType::Json, mapping)
    }

    /// `COALESCE(string_agg(values, separator), '')`
    fn string_join(&self, values: &SqlExpression, separator: &SqlExpression) -> Result<SqlExpression> {
        let f = &self.factory;
        let aggregate = f.aggregate_function(
            "string_agg",
            vec![values.clone(), separator.clone()],
            &[false, false],
            HostType::String,
            values.type_mapping().cloned(),
        )?;
        f.function(
            "COALESCE",
            vec![aggregate, f.constant(HostValue::string(""))],
            &[false, false],
            HostType::String,
            None,
        )
    }
}

impl Translator for MiscAggregateTranslator {
    fn name(&self) -> &'static str {
        "misc-aggregate"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::Aggregate {
            return Ok(None);
        }
        let f = &self.factory;

        let expression = match (operation.name(), args) {
            ("StringJoin", [values, separator]) => self.string_join(values, separator)?,
            ("ArrayAgg", [values]) => {
                let host_type = HostType::array(values.host_type().clone());
                let mapping = match values.type_mapping() {
                    Some(element) => f.registry().find_array_mapping(element, true).ok(),
                    None => f.registry().find_mapping_for_host(&host_type),
                };
                f.aggregate_function("array_agg", vec![values.clone()], &[false], host_type, mapping)?
            }
            ("JsonAgg", [values]) => self.json_aggregate("json_agg", vec![values.clone()], "json")?,
            ("JsonbAgg", [values]) => self.json_aggregate("jsonb_agg", vec![values.clone()], "jsonb")?,
            ("JsonObjectAgg" | "JsonbObjectAgg", [pair]) => {
                let Some((key, value)) = unpack_pair(f, pair) else {
                    return Ok(None);
                };
                if operation.name() == "JsonObjectAgg" {
                    self.json_aggregate("json_object_agg", vec![key, value], "json")?
                } else {
                    self.json_aggregate("jsonb_object_agg", vec![key, value], "jsonb")?
                }
            }
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

    #[test]
    fn test_string_join_defaults_to_empty() {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let t = MiscAggregateTranslator::new(factory.clone());
        let names = SqlExpression::column(None, "name", true, HostType::String, None);
        let result = t
            .translate(
                &Operation::method(Domain::Aggregate, "StringJoin", 2),
                &[names, factory.constant(HostValue::string(", "))],
            )
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "COALESCE(string_agg(name, ', '), '')");
    }

    #[test]
    fn test_array_agg_builds_array_mapping() {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let t = MiscAggregateTranslator::new(factory.clone());
        let ids = SqlExpression::column(
            None,
            "id",
            false,
            HostType::Int64,
            factory.registry().find_mapping_for_host(&HostType::Int64),
        );
        let result = t
            .translate(&Operation::method(Domain::Aggregate, "ArrayAgg", 1), &[ids])
            .unwrap()
            .unwrap();
        assert_eq!(result.store_type(), Some("bigint[]"));
    }
}
