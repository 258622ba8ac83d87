//! KingbaseES operation translators
//!
//! Host-side operations (identified by domain, name and arity) are lowered to
//! SQL expression nodes by an ordered chain of translators:
//!
//! ```text
//! Operation + operands -> TranslatorProvider -> Translator ... -> SqlExpression
//! ```
//!
//! Each translator owns the operations of one capability domain (arrays,
//! ranges, JSON, full-text search and so on) and declines everything else.

pub mod operation;
pub mod provider;
pub mod translators;

pub use operation::{Domain, Operation, OperationKind};
pub use provider::{Translator, TranslatorProvider};
pub use translators::RegexOptions;
