//! Network address translations
//!
//! Translates the inet / cidr / macaddr operators (comparison, containment,
//! bitwise, arithmetic) and functions (abbrev, broadcast, family, host,
//! hostmask, masklen, netmask, network, set_masklen, text,
//! inet_same_family, inet_merge, trunc, macaddr8_set7bit).

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator, UnaryOperator};
use kingbase_sql_types::HostType;

use super::predicate;
use crate::{Domain, Operation, Translator};

pub struct NetworkTranslator {
    factory: SqlExpressionFactory,
}

fn is_network(host_type: &HostType) -> bool {
    matches!(host_type, HostType::IpAddress | HostType::IpNetwork | HostType::MacAddress)
}

fn predicate_operator(name: &str) -> Option<SqlOperator> {
    let op = match name {
        "LessThan" => SqlOperator::LessThan,
        "LessThanOrEqual" => SqlOperator::LessThanOrEqual,
        "GreaterThanOrEqual" => SqlOperator::GreaterThanOrEqual,
        "GreaterThan" => SqlOperator::GreaterThan,
        "ContainedBy" => SqlOperator::StrictlyLeftOf,
        "ContainedByOrEqual" => SqlOperator::ContainedByOrEqual,
        "Contains" => SqlOperator::StrictlyRightOf,
        "ContainsOrEqual" => SqlOperator::ContainsOrEqual,
        "ContainsOrContainedBy" => SqlOperator::Overlaps,
        _ => return None,
    };
    Some(op)
}

/// Single-argument functions: (operation, function, result host type or `None` for the operand's)
const UNARY_FUNCTIONS: &[(&str, &str, Option<HostType>)] = &[
    ("Abbreviate", "abbrev", Some(HostType::String)),
    ("Broadcast", "broadcast", Some(HostType::IpAddress)),
    ("Family", "family", Some(HostType::Int32)),
    ("Host", "host", Some(HostType::String)),
    ("HostMask", "hostmask", Some(HostType::IpAddress)),
    ("MaskLength", "masklen", Some(HostType::Int32)),
    ("Netmask", "netmask", Some(HostType::IpAddress)),
    ("Network", "network", Some(HostType::IpNetwork)),
    ("Text", "text", Some(HostType::String)),
    ("Truncate", "trunc", None),
    ("Set7BitMac8", "macaddr8_set7bit", None),
];

impl NetworkTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    fn same_type_binary(&self, op: SqlOperator, left: &SqlExpression, right: &SqlExpression) -> Result<SqlExpression> {
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

impl Translator for NetworkTranslator {
    fn name(&self) -> &'static str {
        "network"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::Network {
            return Ok(None);
        }
        let Some(first) = args.first() else {
            return Ok(None);
        };
        if !is_network(first.host_type()) {
            return Ok(None);
        }
        let f = &self.factory;
        let name = operation.name();

        if let ([left, right], Some(op)) = (args, predicate_operator(name)) {
            return predicate(f, op, left, right).map(Some);
        }
        if let Some((_, function, result)) = UNARY_FUNCTIONS.iter().find(|(n, _, _)| *n == name) {
            let [operand] = args else {
                return Ok(None);
            };
            let (host_type, mapping) = match result {
                Some(host_type) => (host_type.clone(), None),
                None => (operand.host_type().clone(), operand.type_mapping().cloned()),
            };
            return f
                .function(function, vec![operand.clone()], &[true], host_type, mapping)
                .map(Some);
        }

        let expression = match (name, args) {
            ("BitwiseNot", [operand]) => f.unary(
                UnaryOperator::BitwiseNot,
                operand.clone(),
                &[true],
                operand.host_type().clone(),
                operand.type_mapping().cloned(),
            )?,
            ("BitwiseAnd", [left, right]) => self.same_type_binary(SqlOperator::BitwiseAnd, left, right)?,
            ("BitwiseOr", [left, right]) => self.same_type_binary(SqlOperator::BitwiseOr, left, right)?,
            ("Add", [address, amount]) => self.same_type_binary(SqlOperator::Add, address, amount)?,
            ("Subtract", [left, right]) if is_network(right.host_type()) => f.binary(
                SqlOperator::Subtract,
                left.clone(),
                right.clone(),
                &[true, true],
                HostType::Int64,
                None,
            )?,
            ("Subtract", [address, amount]) => self.same_type_binary(SqlOperator::Subtract, address, amount)?,
            ("SetMaskLength", [operand, length]) => f.function(
                "set_masklen",
                vec![operand.clone(), length.clone()],
                &[true, true],
                operand.host_type().clone(),
                operand.type_mapping().cloned(),
            )?,
            ("SameFamily", [left, right]) => f.function(
                "inet_same_family",
                vec![left.clone(), right.clone()],
                &[true, true],
                HostType::Bool,
                None,
            )?,
            ("Merge", [left, right]) => f.function(
                "inet_merge",
                vec![left.clone(), right.clone()],
                &[true, true],
                HostType::IpNetwork,
                None,
            )?,
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

    fn inet(name: &str, translator: &NetworkTranslator) -> SqlExpression {
        let mapping = translator.factory.registry().find_mapping_for_host(&HostType::IpAddress);
        SqlExpression::column(None, name, false, HostType::IpAddress, mapping)
    }

    #[test]
    fn test_address_difference_is_bigint() {
        let t = NetworkTranslator::new(SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default())));
        let result = t
            .translate(&Operation::method(Domain::Network, "Subtract", 2), &[inet("a", &t), inet("b", &t)])
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "a - b");
        assert_eq!(result.store_type(), Some("bigint"));
    }

    #[test]
    fn test_contained_by_or_equal() {
        let t = NetworkTranslator::new(SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default())));
        let result = t
            .translate(
                &Operation::method(Domain::Network, "ContainedByOrEqual", 2),
                &[inet("a", &t), inet("b", &t)],
            )
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "a <<= b");
    }

    #[test]
    fn test_mask_length() {
        let t = NetworkTranslator::new(SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default())));
        let result = t
            .translate(&Operation::method(Domain::Network, "MaskLength", 1), &[inet("a", &t)])
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "masklen(a)");
        assert_eq!(result.host_type(), &HostType::Int32);
    }
}
