//! # Validator Cache
//!
//! Compiled validators keyed by model type and an optional explicit key,
//! backed by `DashMap` so threads validating different models can populate
//! it concurrently.
//!
//! Compilation runs outside the shard lock. When two threads compile the
//! same key at once, the first stored validator wins and the other result
//! is dropped; both are built from the same specification, so callers
//! cannot tell them apart.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use mval_core::CompileError;
use tracing::{debug, trace};

use crate::validator::Validator;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    type_id: TypeId,
    key: Option<String>,
}

impl CacheKey {
    fn of<M: 'static>(key: Option<&str>) -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            key: key.map(str::to_owned),
        }
    }
}

/// Thread-safe store of compiled validators.
#[derive(Default)]
pub struct ValidatorCache {
    entries: DashMap<CacheKey, Arc<dyn Any + Send + Sync>>,
}

impl ValidatorCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached validator for `M` under `key`, compiling it with
    /// `compile` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compile`. Failures are not cached.
    pub fn get_or_compile<M, F>(
        &self,
        key: Option<&str>,
        compile: F,
    ) -> Result<Arc<Validator<M>>, CompileError>
    where
        M: 'static,
        F: FnOnce() -> Result<Validator<M>, CompileError>,
    {
        let cache_key = CacheKey::of::<M>(key);
        let hit = self
            .entries
            .get(&cache_key)
            .map(|entry| Arc::clone(entry.value()));
        if let Some(validator) = hit.and_then(|entry| entry.downcast::<Validator<M>>().ok()) {
            trace!(model = std::any::type_name::<M>(), ?key, "validator cache hit");
            return Ok(validator);
        }

        let compiled = Arc::new(compile()?);
        let stored = Arc::clone(
            self.entries
                .entry(cache_key)
                .or_insert_with(|| Arc::clone(&compiled) as Arc<dyn Any + Send + Sync>)
                .value(),
        );
        debug!(
            model = std::any::type_name::<M>(),
            ?key,
            "stored compiled validator"
        );
        Ok(stored.downcast::<Validator<M>>().unwrap_or(compiled))
    }

    /// Whether a validator for `M` under `key` is cached.
    pub fn contains<M: 'static>(&self, key: Option<&str>) -> bool {
        self.entries.contains_key(&CacheKey::of::<M>(key))
    }

    /// Number of cached validators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached validator.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("entries_count", &self.entries.len())
            .finish()
    }
}
