//! KingbaseES type mapping and operation translation for Rust
//!
//! This crate bundles the pieces a query pipeline needs to talk to
//! KingbaseES:
//! - Store type parsing and the type-mapping registry
//! - SQL literal rendering for every host value type
//! - Typed SQL expression nodes with null-propagation metadata
//! - Translators lowering host operations (ranges, JSON, full-text search,
//!   trigram similarity, ...) to SQL expressions
//!
//! # Example
//!
//! ```
//! use kingbase_sql::{HostType, HostValue, TypeMappingRegistry};
//!
//! let registry = TypeMappingRegistry::default();
//! let mapping = registry.find_mapping_for_host(&HostType::Int32).unwrap();
//! assert_eq!(mapping.store_type(), "integer");
//! assert_eq!(mapping.render_toplevel(&HostValue::Int32(5)).unwrap(), "5");
//! ```

use std::sync::Arc;

// Re-export all public APIs from internal crates
pub use kingbase_sql_diagnostics as diagnostics;
pub use kingbase_sql_expr as expr;
pub use kingbase_sql_mapping as mapping;
pub use kingbase_sql_translate as translate;
pub use kingbase_sql_types as types;

// Convenience re-exports
pub use kingbase_sql_diagnostics::{KbError, Result};
pub use kingbase_sql_expr::{SqlExpression, SqlExpressionFactory};
pub use kingbase_sql_mapping::{MappingOptions, MappingRequest, TypeMapping, TypeMappingRegistry};
pub use kingbase_sql_translate::{Domain, Operation, TranslatorProvider};
pub use kingbase_sql_types::{HostType, HostValue};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;

/// Build the standard translator chain over a shared registry
pub fn standard_translators(registry: Arc<TypeMappingRegistry>) -> TranslatorProvider {
    TranslatorProvider::with_standard_translators(SqlExpressionFactory::new(registry))
}
