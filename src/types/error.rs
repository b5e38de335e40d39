use thiserror::Error;

use super::condition::Operator;

/// Failure to compile a condition list. Raised only while compiling; a
/// predicate that compiled never fails to evaluate.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl CompileError {
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CompileError::Validation(_))
    }

    #[must_use]
    pub fn is_coercion(&self) -> bool {
        matches!(self, CompileError::Coercion(_))
    }
}

/// A condition is structurally unusable against the record type.
///
/// `position` locates the condition: `[2]` for the third top-level condition,
/// `[2].additional[0]` for its first nested condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no conditions supplied; at least one condition is required")]
    EmptyConditions,

    #[error("condition {position} has an empty property name")]
    EmptyPropertyName { position: String },

    #[error("condition {position}: property '{field}' not found in type '{record}'")]
    UnknownField {
        field: String,
        record: String,
        position: String,
    },

    #[error("condition {position}: 'In' on '{field}' has no candidate values")]
    EmptyInValues { field: String, position: String },

    #[error("condition {position}: '{operator}' on '{field}' has no operand")]
    MissingOperand {
        field: String,
        operator: Operator,
        position: String,
    },

    #[error(
        "condition {position}: '{operator}' is not defined for '{field}' of type '{field_type}'"
    )]
    UnsupportedOperator {
        field: String,
        operator: String,
        field_type: String,
        position: String,
    },
}

/// An operand string could not be converted to the field's declared type.
#[derive(Debug, Error)]
#[error("condition {position}: cannot convert '{raw}' to {target} for property '{field}'")]
pub struct CoercionError {
    pub field: String,
    pub raw: String,
    pub target: String,
    pub position: String,
    #[source]
    pub source: OperandError,
}

/// Underlying parse failure of a [`CoercionError`].
#[derive(Debug, Error)]
pub enum OperandError {
    #[error(transparent)]
    Int(#[from] std::num::ParseIntError),

    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),

    #[error(transparent)]
    Decimal(#[from] rust_decimal::Error),

    #[error("expected 'true' or 'false'")]
    Bool,

    #[error("no date/time format matched (tried {})", formats.join(", "))]
    DateTime { formats: Vec<String> },

    #[error("not a member of {name} (expected one of {})", members.join(", "))]
    EnumMember {
        name: &'static str,
        members: &'static [&'static str],
    },
}
