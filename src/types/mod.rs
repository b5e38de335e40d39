mod condition;
mod error;
mod expr;
mod options;
mod predicate;
mod schema;
mod value;

pub use condition::{Condition, LogicalOperator, Operator};
pub use error::{CoercionError, CompileError, OperandError, ValidationError};
pub use expr::CompareOp;
pub(crate) use expr::CompiledExpr;
pub use options::{CacheKeyMode, CompilerOptions};
pub(crate) use options::DEFAULT_DATE_FORMATS;
pub use predicate::Predicate;
pub use schema::{EnumType, FieldKind, FieldType, Record, RuleEnum, Schema, SchemaBuilder};
pub use value::Value;
