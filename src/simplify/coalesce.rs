//! Optional single-flight gate for identical in-flight requests.
//!
//! Holders of the same key are serialized; the orchestrator re-checks the
//! cache after acquiring so a waiter is served by the first caller's result.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::types::CacheKey;

#[derive(Debug, Default)]
pub struct InflightGate {
    inflight: Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>,
}

impl InflightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive ownership of `key`.
    pub async fn acquire(&self, key: &CacheKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut inflight = self.inflight.lock();
            // Unreferenced slots belong to finished calls.
            inflight.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(
                inflight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Keys with a holder or waiter.
    pub fn active(&self) -> usize {
        self.inflight
            .lock()
            .values()
            .filter(|slot| Arc::strong_count(slot) > 1)
            .count()
    }
}
