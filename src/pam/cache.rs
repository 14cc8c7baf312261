//! Per-cycle cache for read-only fan-out calls
//!
//! Many resources resolve their associations through the same application
//! environment tree during one convergence. Each canonical URL is fetched at
//! most once per cycle; concurrent readers wait on the first fetch and share
//! its decoded value.

use super::error::{ApiError, ApiResult};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use uuid::Uuid;

type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

#[derive(Debug, Default)]
struct CycleState {
    id: Uuid,
    entries: HashMap<String, Slot>,
}

/// Unbounded URL → decoded value map, reset at cycle boundaries
#[derive(Debug, Clone)]
pub struct CycleCache {
    state: Arc<Mutex<CycleState>>,
}

impl Default for CycleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleCache {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CycleState {
                id: Uuid::new_v4(),
                entries: HashMap::new(),
            })),
        }
    }

    /// Identifier of the current cycle
    pub fn cycle_id(&self) -> Uuid {
        self.lock_state().id
    }

    /// Return the cached value for `url`, running `fetch` on the first miss.
    ///
    /// A failed fetch leaves the slot empty, so the next caller tries again.
    pub async fn get_or_fetch<T, F, Fut>(&self, url: &str, fetch: F) -> ApiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let (slot, cycle) = {
            let mut state = self.lock_state();
            let slot = state.entries.entry(url.to_string()).or_default().clone();
            (slot, state.id)
        };

        if slot.initialized() {
            tracing::trace!(%cycle, url, "cache hit");
        }

        let value = slot
            .get_or_try_init(|| async move {
                tracing::debug!(%cycle, url, "cache miss, fetching");
                let value = fetch().await?;
                Ok::<_, ApiError>(Arc::new(value) as Arc<dyn Any + Send + Sync>)
            })
            .await?
            .clone();

        value
            .downcast::<T>()
            .map_err(|_| ApiError::validation(format!("cached value for {} has an unexpected type", url)))
    }

    /// Forget one URL; the next reader fetches it again
    pub fn invalidate(&self, url: &str) {
        if self.lock_state().entries.remove(url).is_some() {
            tracing::debug!(url, "cache entry invalidated");
        }
    }

    /// Drop every entry and start a new cycle
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.entries.clear();
        state.id = Uuid::new_v4();
        tracing::debug!(cycle = %state.id, "cache cycle started");
    }

    pub fn len(&self) -> usize {
        self.lock_state().entries.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CycleState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_readers_share_one_fetch() {
        let cache = CycleCache::new();
        let fetches = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cache = cache.clone();
            let fetches = fetches.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch("/apps/A1/root-environment-group", || async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(vec!["env-1".to_string(), "env-2".to_string()])
                    })
                    .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = CycleCache::new();

        let first: ApiResult<Arc<u32>> = cache.get_or_fetch("/x", || async { Err(ApiError::NotFound) }).await;
        assert!(first.unwrap_err().is_not_found());
        assert!(cache.is_empty());

        let second = cache.get_or_fetch("/x", || async { Ok(7u32) }).await.unwrap();
        assert_eq!(*second, 7);
    }

    #[tokio::test]
    async fn test_reset_starts_new_cycle() {
        let cache = CycleCache::new();
        let before = cache.cycle_id();
        cache.get_or_fetch("/x", || async { Ok(1u32) }).await.unwrap();

        cache.reset();

        assert_ne!(before, cache.cycle_id());
        let value = cache.get_or_fetch("/x", || async { Ok(2u32) }).await.unwrap();
        assert_eq!(*value, 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = CycleCache::new();
        cache.get_or_fetch("/x", || async { Ok(1u32) }).await.unwrap();
        cache.invalidate("/x");
        let value = cache.get_or_fetch("/x", || async { Ok(3u32) }).await.unwrap();
        assert_eq!(*value, 3);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_error() {
        let cache = CycleCache::new();
        cache.get_or_fetch("/x", || async { Ok(1u32) }).await.unwrap();
        let wrong: ApiResult<Arc<String>> = cache.get_or_fetch("/x", || async { Ok(String::new()) }).await;
        assert!(wrong.is_err());
    }
}
