use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::types::Predicate;

/// Identity of one compiled rule set: record type, schema and the
/// fingerprint of the condition list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub(crate) record: TypeId,
    pub(crate) schema: SchemaKey,
    pub(crate) fingerprint: blake3::Hash,
}

/// Which field table a predicate reads through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SchemaKey {
    /// The record type's own `Record::schema()`.
    Record,
    /// A caller-supplied schema, by the address of its field table. The
    /// cached predicate holds that table, so the address stays unique for
    /// as long as the entry exists.
    Instance { name: &'static str, addr: usize },
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Process-lifetime store of compiled predicates. No eviction, no bound.
///
/// Owned by a [`RuleCompiler`](crate::RuleCompiler); construct separate
/// compilers for isolated caches.
pub struct PredicateCache {
    entries: RwLock<AHashMap<CacheKey, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl Default for PredicateCache {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl PredicateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(AHashMap::with_capacity(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a compiled predicate, counting the hit or miss.
    pub(crate) fn get<T: 'static>(&self, key: &CacheKey) -> Option<Arc<Predicate<T>>> {
        let found = self
            .entries
            .read()
            .get(key)
            .cloned()
            .and_then(|entry| entry.downcast::<Predicate<T>>().ok());
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a predicate unless one is already stored for the key, and return
    /// whichever is stored. Racing compilations of one key all settle on the
    /// first stored predicate.
    pub(crate) fn get_or_insert<T: 'static>(
        &self,
        key: CacheKey,
        predicate: Arc<Predicate<T>>,
    ) -> Arc<Predicate<T>> {
        let stored = {
            let mut entries = self.entries.write();
            let entry: Entry = Arc::clone(&predicate) as Entry;
            Arc::clone(entries.entry(key).or_insert(entry))
        };
        stored.downcast::<Predicate<T>>().unwrap_or(predicate)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for PredicateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateCache")
            .field("stats", &self.stats())
            .finish()
    }
}
