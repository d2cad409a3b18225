//! Memoized fallback recipes, keyed by static type.
//!
//! Resolving a fallback walks the type's definition and its bases, so the
//! answer (including "no fallback") is computed once per `TypeId` and then
//! shared. Entries are never evicted or replaced.
//!
//! `TypeId`s only mean something relative to the `TypeInterner` that
//! produced them, so a cache must not be shared between interners.

use dashmap::DashMap;
use nullsafe_expr::Expr;
use nullsafe_types::TypeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// A recipe producing an empty instance of the key type, or `None` when the
/// type has no collection or array fallback.
pub type FallbackEntry = Option<Arc<Expr>>;

/// Snapshot of cache activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FallbackCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Concurrent `TypeId -> FallbackEntry` map.
///
/// Lookups and inserts may race; the resolver is pure, so two threads may
/// both compute an entry and the first insert wins.
#[derive(Debug, Default)]
pub struct TypeFallbackCache {
    entries: DashMap<TypeId, FallbackEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TypeFallbackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached entry for `ty`, computing it with `resolve` on a miss.
    ///
    /// No shard lock is held while `resolve` runs.
    pub fn get_or_compute(
        &self,
        ty: TypeId,
        resolve: impl FnOnce(TypeId) -> Option<Expr>,
    ) -> FallbackEntry {
        if let Some(entry) = self.entries.get(&ty) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(ty = ty.0, present = entry.is_some(), "fallback cache hit");
            return entry.value().clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = resolve(ty).map(Arc::new);
        trace!(ty = ty.0, present = computed.is_some(), "fallback cache miss");

        self.entries.entry(ty).or_insert(computed).value().clone()
    }

    /// Cached entry for `ty`, without computing. The outer `Option` is
    /// `None` when `ty` has not been resolved yet.
    pub fn get(&self, ty: TypeId) -> Option<FallbackEntry> {
        self.entries.get(&ty).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, ty: TypeId) -> bool {
        self.entries.contains_key(&ty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> FallbackCacheStats {
        FallbackCacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
