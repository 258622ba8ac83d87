//! Translator dispatch
//!
//! The provider holds an ordered chain of translators and returns the first
//! translation produced. Order matters: two translators may claim the same
//! operation name with different argument-shape guards.

use kingbase_sql_diagnostics::{ErrorBuilder, KB0100, KB0105, Result};
use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory};
use log::trace;

use crate::Operation;
use crate::translators::{
    ArrayTranslator, ByteSequenceTranslator, FullTextSearchTranslator, FuzzyStringMatchTranslator,
    JsonTranslator, MiscAggregateTranslator, NetworkTranslator, RangeTranslator, RegexTranslator,
    RowValueTranslator, StatisticsAggregateTranslator, TrigramTranslator,
};

/// Lowers a bounded set of operations to SQL expressions
///
/// Returning `Ok(None)` declines the operation so the next translator can
/// try; errors are reserved for inputs the translator owns but cannot lower.
pub trait Translator: Send + Sync {
    /// Name used in logs and listings
    fn name(&self) -> &'static str;

    fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>>;
}

/// Ordered chain of translators
#[derive(Default)]
pub struct TranslatorProvider {
    translators: Vec<Box<dyn Translator>>,
}

impl TranslatorProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with the built-in translators in their standard order
    pub fn with_standard_translators(factory: SqlExpressionFactory) -> Self {
        let mut provider = Self::new();
        provider.append(ArrayTranslator::new(factory.clone()));
        provider.append(RangeTranslator::new(factory.clone()));
        provider.append(JsonTranslator::new(factory.clone()));
        provider.append(NetworkTranslator::new(factory.clone()));
        provider.append(FullTextSearchTranslator::new(factory.clone()));
        provider.append(TrigramTranslator::new(factory.clone()));
        provider.append(FuzzyStringMatchTranslator::new(factory.clone()));
        provider.append(RegexTranslator::new(factory.clone()));
        provider.append(ByteSequenceTranslator::new(factory.clone()));
        provider.append(StatisticsAggregateTranslator::new(factory.clone()));
        provider.append(MiscAggregateTranslator::new(factory.clone()));
        provider.append(RowValueTranslator::new(factory));
        provider
    }

    /// Add a translator ahead of all others
    pub fn prepend(&mut self, translator: impl Translator + 'static) {
        self.translators.insert(0, Box::new(translator));
    }

    /// Add a translator after all others
    pub fn append(&mut self, translator: impl Translator + 'static) {
        self.translators.push(Box::new(translator));
    }

    /// Translator names in dispatch order
    pub fn names(&self) -> Vec<&'static str> {
        self.translators.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// Try each translator in order; `Ok(None)` means untranslated
    pub fn translate(&self, operation: &Operation, args: &[SqlExpression]) -> Result<Option<SqlExpression>> {
        if args.len() != operation.arity() {
            return Err(ErrorBuilder::new(
                KB0105,
                format!("Expected {} operands, got {}", operation.arity(), args.len()),
            )
            .subject(operation.to_string())
            .translation());
        }

        for translator in &self.translators {
            trace!("Trying {} for {}", translator.name(), operation);
            if let Some(expression) = translator.translate(operation, args)? {
                trace!("{} translated {} to {}", translator.name(), operation, expression);
                return Ok(Some(expression));
            }
        }
        Ok(None)
    }

    /// Translate, failing when no translator claims the operation
    pub fn translate_or_fail(&self, operation: &Operation, args: &[SqlExpression]) -> Result<SqlExpression> {
        self.translate(operation, args)?.ok_or_else(|| {
            ErrorBuilder::new(KB0100, format!("The operation {} could not be translated", operation))
                .subject(operation.to_string())
                .translation()
        })
    }
}

impl std::fmt::Debug for TranslatorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorProvider")
            .field("translators", &self.names())
            .finish()
    }
}
