use std::fmt;

use super::Value;

/// Comparison operators a compiled predicate evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Compiled expression tree. Field names are resolved to indices into the
/// record's [`Schema`](super::Schema) and every constant is already coerced to
/// the field's declared type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CompiledExpr {
    Compare {
        field_index: usize,
        field: &'static str,
        op: CompareOp,
        value: Value,
    },
    And(Box<CompiledExpr>, Box<CompiledExpr>),
    Or(Box<CompiledExpr>, Box<CompiledExpr>),
}

impl CompiledExpr {
    #[must_use]
    pub(crate) fn and(self, other: CompiledExpr) -> CompiledExpr {
        CompiledExpr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub(crate) fn or(self, other: CompiledExpr) -> CompiledExpr {
        CompiledExpr::Or(Box::new(self), Box::new(other))
    }

    /// Number of leaf comparisons in the tree.
    pub(crate) fn comparisons(&self) -> usize {
        match self {
            CompiledExpr::Compare { .. } => 1,
            CompiledExpr::And(a, b) | CompiledExpr::Or(a, b) => a.comparisons() + b.comparisons(),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledExpr::Compare {
                field, op, value, ..
            } => write!(f, "({field} {op} {value})"),
            CompiledExpr::And(a, b) => write!(f, "({a} AND {b})"),
            CompiledExpr::Or(a, b) => write!(f, "({a} OR {b})"),
        }
    }
}
