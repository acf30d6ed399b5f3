//! Process-lifetime memo of successful simplify results.
//!
//! Unbounded, no TTL. Entries live until `clear` or process exit.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::{CacheKey, SimplifyResult};

/// Result cache keyed by exact `(text, language)`.
#[derive(Debug, Default)]
pub struct SimplifyCache {
    entries: RwLock<HashMap<CacheKey, Arc<SimplifyResult>>>,
}

impl SimplifyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the cached result, if any.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<SimplifyResult>> {
        self.entries.read().get(key).cloned()
    }

    /// Store a result. A later write for the same key replaces the earlier one.
    pub fn insert(&self, key: CacheKey, result: Arc<SimplifyResult>) -> Option<Arc<SimplifyResult>> {
        self.entries.write().insert(key, result)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Drop every entry under a single write lock.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
