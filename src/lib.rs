mod cache;
mod coerce;
mod compile;
mod compiler;
mod evaluate;
mod fingerprint;
mod types;

pub use cache::{CacheStats, PredicateCache};
pub use compiler::RuleCompiler;
pub use types::{
    CacheKeyMode, CoercionError, CompareOp, CompileError, CompilerOptions, Condition, EnumType,
    FieldKind, FieldType, LogicalOperator, OperandError, Operator, Predicate, Record, RuleEnum,
    Schema, SchemaBuilder, ValidationError, Value,
};
