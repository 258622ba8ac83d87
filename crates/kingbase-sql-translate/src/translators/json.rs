//! JSON document translations
//!
//! Translates: GetProperty, GetString, GetInt32, GetInt64, GetDouble,
//! GetDecimal, GetBoolean, GetArrayLength, JsonContains, JsonContained,
//! JsonExists, JsonExistsAny, JsonExistsAll, JsonTypeof, JsonPath,
//! JsonPathText. The first operand is the document.

use kingbase_sql_diagnostics::{ErrorBuilder, KB0001, KB0103, Result};
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory, SqlOperator};
use kingbase_sql_types::HostType;

use super::predicate;
use crate::{Domain, Operation, Translator};

/// Typed property getters: (operation, host type of the cast target)
const TYPED_GETTERS: &[(&str, HostType)] = &[
    ("GetInt32", HostType::Int32),
    ("GetInt64", HostType::Int64),
    ("GetDouble", HostType::Float64),
    ("GetDecimal", HostType::Decimal),
    ("GetBoolean", HostType::Bool),
];

pub struct JsonTranslator {
    factory: SqlExpressionFactory,
}

impl JsonTranslator {
    pub fn new(factory: SqlExpressionFactory) -> Self {
        Self { factory }
    }

    /// Whether the document is stored as `jsonb` (the default for unmapped documents)
    fn is_jsonb(document: &SqlExpression) -> Option<bool> {
        match document.store_type() {
            Some("jsonb") => Some(true),
            Some("json") => Some(false),
            Some(_) => None,
            None => (*document.host_type() == HostType::Json).then_some(true),
        }
    }

    fn function_name(jsonb: bool, name: &str) -> String {
        if jsonb {
            format!("jsonb_{}", name)
        } else {
            format!("json_{}", name)
        }
    }

    fn require_jsonb(jsonb: bool, operation: &Operation) -> Result<()> {
        if jsonb {
            return Ok(());
        }
        Err(ErrorBuilder::new(
            KB0103,
            format!("{} is only supported on jsonb columns", operation.name()),
        )
        .subject(operation.to_string())
        .context("Map the column to jsonb to use containment and existence operators")
        .translation())
    }

    fn get_text(&self, document: &SqlExpression, key: &SqlExpression) -> Result<SqlExpression> {
        self.factory.binary(
            SqlOperator::JsonGetText,
            document.clone(),
            key.clone(),
            &[true, true],
            HostType::String,
            None,
        )
    }

    fn path_operand(&self, path: &[SqlExpression]) -> Result<SqlExpression> {
        match path {
            [single] if single.host_type().is_sequence() => Ok(single.clone()),
            elements => {
                let flags = vec![false; elements.len()];
                self.factory
                    .array_literal(elements.to_vec(), HostType::String, &flags)
            }
        }
    }
}

impl Translator for JsonTranslator {
    fn name(&self) -> &'static str {
        "json"
    }

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if operation.domain() != Domain::Json {
            return Ok(None);
        }
        let Some(document) = args.first() else {
            return Ok(None);
        };
        let Some(jsonb) = Self::is_jsonb(document) else {
            return Ok(None);
        };
        let f = &self.factory;
        let name = operation.name();

        if let Some((_, target)) = TYPED_GETTERS.iter().find(|(getter, _)| *getter == name) {
            let [document, key] = args else {
                return Ok(None);
            };
            let mapping = f.registry().find_mapping_for_host(target).ok_or_else(|| {
                ErrorBuilder::new(KB0001, format!("No mapping for host type {}", target))
                    .subject(target.to_string())
                    .mapping()
            })?;
            let text = self.get_text(document, key)?;
            return f.cast(text, mapping, &[true]).map(Some);
        }

        let expression = match (name, args) {
            ("GetProperty", [document, key]) => f.binary(
                SqlOperator::JsonGet,
                document.clone(),
                key.clone(),
                &[true, true],
                document.host_type().clone(),
                document.type_mapping().cloned(),
            )?,
            ("GetString", [document, key]) => self.get_text(document, key)?,
            ("GetArrayLength", [document]) => f.function(
                &Self::function_name(jsonb, "array_length"),
                vec![document.clone()],
                &[true],
                HostType::Int32,
                None,
            )?,
            ("JsonTypeof", [document]) => f.function(
                &Self::function_name(jsonb, "typeof"),
                vec![document.clone()],
                &[true],
                HostType::String,
                None,
            )?,
            ("JsonContains", [document, other]) => {
                Self::require_jsonb(jsonb, operation)?;
                predicate(f, SqlOperator::Contains, document, other)?
            }
            ("JsonContained", [document, other]) => {
                Self::require_jsonb(jsonb, operation)?;
                predicate(f, SqlOperator::ContainedBy, document, other)?
            }
            ("JsonExists", [document, key]) => {
                Self::require_jsonb(jsonb, operation)?;
                predicate(f, SqlOperator::JsonExists, document, key)?
            }
            ("JsonExistsAny", [document, keys]) => {
                Self::require_jsonb(jsonb, operation)?;
                predicate(f, SqlOperator::JsonExistsAny, document, keys)?
            }
            ("JsonExistsAll", [document, keys]) => {
                Self::require_jsonb(jsonb, operation)?;
                predicate(f, SqlOperator::JsonExistsAll, document, keys)?
            }
            ("JsonPath", [document, path @ ..]) if !path.is_empty() => f.binary(
                SqlOperator::JsonGetPath,
                document.clone(),
                self.path_operand(path)?,
                &[true, true],
                document.host_type().clone(),
                document.type_mapping().cloned(),
            )?,
            ("JsonPathText", [document, path @ ..]) if !path.is_empty() => f.binary(
                SqlOperator::JsonGetPathText,
                document.clone(),
                self.path_operand(path)?,
                &[true, true],
                HostType::String,
                None,
            )?,
            _ => return Ok(None),
        };
        Ok(Some(expression))
    }
}
