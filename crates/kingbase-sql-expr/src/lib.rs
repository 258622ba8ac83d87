//! KingbaseES SQL expression model
//!
//! Typed expression nodes produced by the translators. Every composite node
//! carries a null-propagation flag per operand and, once resolved, the type
//! mapping of its result.

pub mod expression;
pub mod factory;
pub mod operator;

pub use expression::{ExpressionKind, NullPropagation, SqlExpression};
pub use factory::SqlExpressionFactory;
pub use operator::{SqlOperator, UnaryOperator};
