use std::fmt;

use super::condition::Condition;
use super::error::CompileError;
use super::expr::CompiledExpr;
use super::options::DEFAULT_DATE_FORMATS;
use super::schema::{Record, Schema};

/// A compiled, immutable decision function over records of type `T`.
///
/// Every comparison inside is against a constant already coerced to the
/// field's declared type, so evaluation cannot fail. Thread-safe and designed
/// to live behind `Arc`.
///
/// # Example
///
/// ```
/// use predicata::{Condition, Operator, Predicate, Record, Schema};
///
/// struct Order { total: i64, express: bool }
///
/// impl Record for Order {
///     fn schema() -> Schema<Self> {
///         Schema::builder("Order")
///             .field("total", |o: &Order| o.total)
///             .field("express", |o: &Order| o.express)
///             .build()
///     }
/// }
///
/// let predicate = Predicate::<Order>::compile(&[
///     Condition::new("total", Operator::GreaterThan).value("100").and(),
///     Condition::new("express", Operator::Equals).value("true").and(),
/// ])
/// .unwrap();
///
/// assert!(predicate.evaluate(&Order { total: 250, express: true }));
/// assert!(!predicate.evaluate(&Order { total: 50, express: true }));
/// ```
pub struct Predicate<T> {
    schema: Schema<T>,
    expr: CompiledExpr,
}

impl<T> Predicate<T> {
    pub(crate) fn new(schema: Schema<T>, expr: CompiledExpr) -> Self {
        Self { schema, expr }
    }

    /// Compile without any cache, against an explicit schema.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a condition fails validation or an operand
    /// cannot be coerced.
    pub fn compile_with(schema: &Schema<T>, conditions: &[Condition]) -> Result<Self, CompileError> {
        let formats: Vec<String> = DEFAULT_DATE_FORMATS.iter().map(|f| (*f).to_owned()).collect();
        crate::compile::compile(schema, conditions, &formats)
    }

    /// Evaluate the predicate against one record.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, record: &T) -> bool {
        crate::evaluate::evaluate(&self.expr, &self.schema, record)
    }

    /// Borrow the predicate as a plain closure, e.g. for `Iterator::filter`.
    pub fn as_fn(&self) -> impl Fn(&T) -> bool + '_ {
        move |record: &T| self.evaluate(record)
    }

    /// Name of the record type the predicate was compiled against.
    #[must_use]
    pub fn record_name(&self) -> &'static str {
        self.schema.name()
    }

    /// Number of leaf comparisons, nested conditions and `In` candidates
    /// included.
    #[must_use]
    pub fn comparisons(&self) -> usize {
        self.expr.comparisons()
    }
}

impl<T: Record> Predicate<T> {
    /// Compile without any cache, against `T`'s own schema.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a condition fails validation or an operand
    /// cannot be coerced.
    pub fn compile(conditions: &[Condition]) -> Result<Self, CompileError> {
        Self::compile_with(&T::schema(), conditions)
    }
}

impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("record", &self.schema.name())
            .field("expr", &self.expr)
            .finish()
    }
}
