//! SQL expression nodes
//!
//! Leaf nodes (constants, parameters, columns) are built directly; composite
//! nodes are built through [`SqlExpressionFactory`](crate::SqlExpressionFactory),
//! which checks that the null-propagation flags match the operands.

use kingbase_sql_mapping::TypeMapping;
use kingbase_sql_types::{HostType, HostValue};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use crate::{SqlOperator, UnaryOperator};

/// Per-operand null-propagation flags
pub type NullPropagation = SmallVec<[bool; 4]>;

/// Kind of an expression node
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// Literal value
    Constant(HostValue),
    /// Query parameter
    Parameter(String),
    /// Column reference
    Column {
        table: Option<String>,
        name: String,
        nullable: bool,
    },
    /// Function call; operands are the arguments
    Function {
        name: String,
        aggregate: bool,
        /// Function may return null for non-null arguments
        nullable: bool,
    },
    /// Binary operator over two operands
    Binary(SqlOperator),
    /// Unary operator over one operand
    Unary(UnaryOperator),
    /// Cast of one operand to the node's type mapping
    Cast,
    /// Row value `(a, b, ...)`
    RowValue,
    /// `array[index]` (one-based)
    ArrayIndex,
    /// `item op ANY (array)`
    ArrayAny(SqlOperator),
    /// `position(needle IN haystack)`
    Position,
    /// `ARRAY[a, b, ...]` over non-constant elements
    ArrayLiteral,
}

/// A typed SQL expression node
#[derive(Debug, Clone, PartialEq)]
pub struct SqlExpression {
    kind: ExpressionKind,
    operands: Vec<SqlExpression>,
    propagates_null: NullPropagation,
    host_type: HostType,
    type_mapping: Option<Arc<TypeMapping>>,
}

impl SqlExpression {
    pub(crate) fn composite(
        kind: ExpressionKind,
        operands: Vec<SqlExpression>,
        propagates_null: NullPropagation,
        host_type: HostType,
        type_mapping: Option<Arc<TypeMapping>>,
    ) -> Self {
        Self {
            kind,
            operands,
            propagates_null,
            host_type,
            type_mapping,
        }
    }

    fn leaf(kind: ExpressionKind, host_type: HostType, type_mapping: Option<Arc<TypeMapping>>) -> Self {
        Self::composite(kind, Vec::new(), NullPropagation::new(), host_type, type_mapping)
    }

    /// Create a constant with an explicit host type
    pub fn constant(value: HostValue, host_type: HostType, type_mapping: Option<Arc<TypeMapping>>) -> Self {
        Self::leaf(ExpressionKind::Constant(value), host_type, type_mapping)
    }

    /// Create a parameter reference
    pub fn parameter(
        name: impl Into<String>,
        host_type: HostType,
        type_mapping: Option<Arc<TypeMapping>>,
    ) -> Self {
        Self::leaf(ExpressionKind::Parameter(name.into()), host_type, type_mapping)
    }

    /// Create a column reference
    pub fn column(
        table: Option<&str>,
        name: impl Into<String>,
        nullable: bool,
        host_type: HostType,
        type_mapping: Option<Arc<TypeMapping>>,
    ) -> Self {
        Self::leaf(
            ExpressionKind::Column {
                table: table.map(str::to_string),
                name: name.into(),
                nullable,
            },
            host_type,
            type_mapping,
        )
    }

    /// Replace the type mapping
    pub fn with_type_mapping(mut self, type_mapping: Arc<TypeMapping>) -> Self {
        self.type_mapping = Some(type_mapping);
        self
    }

    // === Accessors ===

    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    pub fn operands(&self) -> &[SqlExpression] {
        &self.operands
    }

    pub fn propagates_null(&self) -> &[bool] {
        &self.propagates_null
    }

    pub fn host_type(&self) -> &HostType {
        &self.host_type
    }

    pub fn type_mapping(&self) -> Option<&Arc<TypeMapping>> {
        self.type_mapping.as_ref()
    }

    /// Store type of the resolved mapping
    pub fn store_type(&self) -> Option<&str> {
        self.type_mapping.as_deref().map(TypeMapping::store_type)
    }

    /// Get the constant value, if this is a constant node
    pub fn constant_value(&self) -> Option<&HostValue> {
        match &self.kind {
            ExpressionKind::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_row_value(&self) -> bool {
        matches!(self.kind, ExpressionKind::RowValue)
    }

    /// Name of the called function, if this is a function node
    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Function { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Check the null-propagation invariant over the whole tree
    pub fn is_well_formed(&self) -> bool {
        self.propagates_null.len() == self.operands.len()
            && self.operands.iter().all(SqlExpression::is_well_formed)
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.kind, ExpressionKind::Binary(_) | ExpressionKind::ArrayAny(_)) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for SqlExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, operands: &[SqlExpression]| -> fmt::Result {
            for (i, operand) in operands.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", operand)?;
            }
            Ok(())
        };

        match &self.kind {
            ExpressionKind::Constant(value) => match &self.type_mapping {
                Some(mapping) => match mapping.render_toplevel(value) {
                    Ok(text) => f.write_str(&text),
                    Err(_) => write!(f, "<invalid literal: {}>", value),
                },
                None => write!(f, "{}", value),
            },
            ExpressionKind::Parameter(name) => write!(f, "@{}", name),
            ExpressionKind::Column { table, name, .. } => match table {
                Some(table) => write!(f, "{}.{}", table, name),
                None => write!(f, "{}", name),
            },
            ExpressionKind::Function { name, .. } => {
                write!(f, "{}(", name)?;
                join(f, &self.operands)?;
                write!(f, ")")
            }
            ExpressionKind::Binary(op) => {
                for (i, operand) in self.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op)?;
                    }
                    operand.fmt_operand(f)?;
                }
                Ok(())
            }
            ExpressionKind::Unary(op) => {
                let Some(operand) = self.operands.first() else {
                    return write!(f, "{}", op);
                };
                if op.is_postfix() {
                    operand.fmt_operand(f)?;
                    write!(f, " {}", op)
                } else if *op == UnaryOperator::Not {
                    write!(f, "NOT ")?;
                    operand.fmt_operand(f)
                } else {
                    write!(f, "{}", op)?;
                    operand.fmt_operand(f)
                }
            }
            ExpressionKind::Cast => {
                if let Some(operand) = self.operands.first() {
                    operand.fmt_operand(f)?;
                }
                match self.store_type() {
                    Some(store_type) => write!(f, "::{}", store_type),
                    None => write!(f, "::{}", self.host_type),
                }
            }
            ExpressionKind::RowValue => {
                write!(f, "(")?;
                join(f, &self.operands)?;
                write!(f, ")")
            }
            ExpressionKind::ArrayLiteral => {
                write!(f, "ARRAY[")?;
                join(f, &self.operands)?;
                write!(f, "]")?;
                match self.store_type() {
                    Some(store_type) => write!(f, "::{}", store_type),
                    None => Ok(()),
                }
            }
            ExpressionKind::ArrayIndex => match self.operands.as_slice() {
                [array, index] => {
                    array.fmt_operand(f)?;
                    write!(f, "[{}]", index)
                }
                _ => join(f, &self.operands),
            },
            ExpressionKind::ArrayAny(op) => match self.operands.as_slice() {
                [item, array] => {
                    item.fmt_operand(f)?;
                    write!(f, " {} ANY ({})", op, array)
                }
                _ => join(f, &self.operands),
            },
            ExpressionKind::Position => match self.operands.as_slice() {
                [needle, haystack] => write!(f, "position({} IN {})", needle, haystack),
                _ => join(f, &self.operands),
            },
        }
    }
}
