use std::any::TypeId;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::cache::{CacheKey, CacheStats, PredicateCache, SchemaKey};
use crate::fingerprint::fingerprint;
use crate::types::{CompileError, CompilerOptions, Condition, Predicate, Record, Schema};

/// Compiles condition lists into predicates, memoized per record type and
/// rule-set identity.
///
/// Compilation is pure CPU work and never blocks beyond the cache lock, so a
/// single compiler can be shared across threads behind `Arc`.
///
/// # Example
///
/// ```
/// use predicata::{Condition, Operator, Record, RuleCompiler, Schema};
///
/// struct Account { balance: i64, is_active: bool }
///
/// impl Record for Account {
///     fn schema() -> Schema<Self> {
///         Schema::builder("Account")
///             .field("Balance", |a: &Account| a.balance)
///             .field("IsActive", |a: &Account| a.is_active)
///             .build()
///     }
/// }
///
/// let compiler = RuleCompiler::new();
/// let rules = [
///     Condition::new("Balance", Operator::GreaterThan).value("100").and(),
///     Condition::new("IsActive", Operator::Equals).value("true").and(),
/// ];
///
/// let eligible = compiler.compile::<Account>(&rules).unwrap();
/// assert!(eligible.evaluate(&Account { balance: 950, is_active: true }));
///
/// let again = compiler.compile::<Account>(&rules).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&eligible, &again));
/// assert_eq!(compiler.stats().hits, 1);
/// ```
#[derive(Debug)]
pub struct RuleCompiler {
    options: CompilerOptions,
    cache: PredicateCache,
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleCompiler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    #[must_use]
    pub fn with_options(options: CompilerOptions) -> Self {
        let cache = PredicateCache::with_capacity(options.initial_capacity);
        Self { options, cache }
    }

    #[must_use]
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    #[must_use]
    pub fn cache(&self) -> &PredicateCache {
        &self.cache
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Compile against `T`'s own schema, reusing a cached predicate when the
    /// same rule set was compiled before.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a condition fails validation or an operand
    /// cannot be coerced. Failures are never cached.
    pub fn compile<T: Record>(&self, conditions: &[Condition]) -> Result<Arc<Predicate<T>>, CompileError> {
        self.lookup_or_compile(&T::schema(), SchemaKey::Record, conditions)
    }

    /// Compile against an explicit schema. Entries are keyed by the schema
    /// value itself: clones of one schema share entries, while separately
    /// built schemas never do, even under the same name.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a condition fails validation or an operand
    /// cannot be coerced. Failures are never cached.
    pub fn compile_with<T: 'static>(
        &self,
        schema: &Schema<T>,
        conditions: &[Condition],
    ) -> Result<Arc<Predicate<T>>, CompileError> {
        let key = SchemaKey::Instance {
            name: schema.name(),
            addr: schema.id(),
        };
        self.lookup_or_compile(schema, key, conditions)
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(record = schema.name(), conditions = conditions.len())
    )]
    fn lookup_or_compile<T: 'static>(
        &self,
        schema: &Schema<T>,
        schema_key: SchemaKey,
        conditions: &[Condition],
    ) -> Result<Arc<Predicate<T>>, CompileError> {
        let key = CacheKey {
            record: TypeId::of::<T>(),
            schema: schema_key,
            fingerprint: fingerprint(conditions, self.options.cache_key),
        };

        if let Some(predicate) = self.cache.get::<T>(&key) {
            debug!(fingerprint = %key.fingerprint, "predicate cache hit");
            return Ok(predicate);
        }

        debug!(fingerprint = %key.fingerprint, "predicate cache miss, compiling");
        let predicate = crate::compile::compile(schema, conditions, &self.options.date_formats)
            .inspect_err(|e| debug!(error = %e, "compilation failed"))?;
        Ok(self.cache.get_or_insert(key, Arc::new(predicate)))
    }
}
