//! Byte sequence translations
//!
//! Translates: Length, Contains, IndexOf, First, ElementAt, SequenceEqual.
//! Single bytes are searched by writing them into a one-byte `bytea`.

use kingbase_sql_diagnostics::Result;
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator};
use kingbase_sql_types::{HostType, HostValue};

use super::{offset, predicate};
use crate::{Domain, Operation, Translator};

pub struct ByteSequenceTranslator {
    factory: SqlExpressionFactory,
}

impl ByteSequenceTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    /// `position(set_byte('\x00'::bytea, 0, value) IN bytes)`
    fn position(&self, bytes: &SqlExpression, value: &SqlExpression) -> Result<SqlExpression> {
        let f = &self.factory;
        let needle = f.function(
            "set_byte",
            vec![
                f.typed_constant(HostValue::Bytes(vec![0]), "bytea")?,
                f.constant(HostValue::Int32(0)),
                value.clone(),
            ],
            &[true, true, true],
            HostType::Bytes,
            None,
        )?;
        f.position(needle, bytes.clone(), &[true, true])
    }

    fn get_byte(&self, bytes: &SqlExpression, index: SqlExpression) -> Result<SqlExpression> {
        self.factory.function(
            "get_byte",
            vec![bytes.clone(), index],
            &[true, true],
            HostType::Int32,
            None,
        )
    }
}

impl Translator for ByteSequenceTranslator {
    fn name(&self) -> &'static str {
        "byte-sequence"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::Bytes {
            return Ok(None);
        }
        if args.first().is_none_or(|b| *b.host_type() != HostType::Bytes) {
            return Ok(None);
        }
        let f = &self.factory;

        let expression = match (operation.name(), args) {
            ("Length", [bytes]) => f.function("length", vec![bytes.clone()], &[true], HostType::Int32, None)?,
            ("Contains", [bytes, value]) => {
                let zero = f.constant(HostValue::Int32(0));
                predicate(f, SqlOperator::GreaterThan, &self.position(bytes, value)?, &zero)?
            }
            ("IndexOf", [bytes, value]) => offset(f, self.position(bytes, value)?, -1)?,
            ("First", [bytes]) => self.get_byte(bytes, f.constant(HostValue::Int32(0)))?,
            ("ElementAt", [bytes, index]) => self.get_byte(bytes, index.clone())?,
            ("SequenceEqual", [bytes, other]) => predicate(f, SqlOperator::Equal, bytes, other)?,
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
    fn test_contains_byte() {
        let factory = SqlExpressionFactory::new(Arc::new(TypeMappingRegistry::default()));
        let t = ByteSequenceTranslator::new(factory.clone());
        let bytes = SqlExpression::column(None, "payload", false, HostType::Bytes, None);
        let value = factory.constant(HostValue::Int32(7));
        let result = t
            .translate(&Operation::method(Domain::Bytes, "Contains", 2), &[bytes, value])
            .unwrap()
            .unwrap();
        assert_eq!(
            result.to_string(),
            r"position(set_byte('\x00'::bytea, 0, 7) IN payload) > 0"
        );
        assert!(result.is_well_formed());
    }
}
