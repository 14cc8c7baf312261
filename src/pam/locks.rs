//! Named locks serializing mutating calls
//!
//! The remote service cannot resolve overlapping writes within some resource
//! families, so every mutating call names the family (or an application /
//! profile id) it belongs to and holds that lock for the whole request,
//! retries included.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// Stable lock names shared by mutating calls
pub mod names {
    pub const TAG: &str = "tag";
    pub const PROFILE: &str = "profile";
    pub const PERMISSIONS: &str = "permissions";
    pub const ROLE: &str = "role";
    pub const POLICY: &str = "policy";
    pub const CONSTRAINT: &str = "constraint";
    pub const APPLICATION: &str = "application";
    pub const ADVANCED_SETTING: &str = "advancedSetting";
    pub const RESOURCE_TYPE: &str = "resourceType";
    pub const RESPONSE_TEMPLATE: &str = "responseTemplate";
    pub const RESOURCE_TYPE_PERMISSIONS: &str = "resourceTypePermissions";
    pub const RESOURCE_LABEL: &str = "resourceLabel";
    pub const RESOURCE_MANAGER_PROFILE: &str = "resourceManagerProfile";
    pub const RESOURCE_MANAGER_PROFILE_POLICY: &str = "resourceManagerProfilePolicy";
    pub const RESOURCE_MANAGER_PROFILE_PERMISSION: &str = "resourceManagerProfilePermission";
    pub const SERVER_ACCESS: &str = "serverAccess";
    pub const RESOURCE_MANAGER_RESOURCE_POLICY: &str = "resourceManagerResourcePolicy";
}

/// Lazily allocated per-name mutexes, shared by all clones
#[derive(Debug, Clone, Default)]
pub struct LockRegistry {
    locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the named lock is free and return its guard
    pub async fn acquire(&self, name: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        tracing::trace!(lock = name, "waiting for lock");
        lock.lock_owned().await
    }

    /// Number of distinct names allocated so far
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_name_is_exclusive() {
        let registry = LockRegistry::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = registry.acquire(names::POLICY).await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_different_names_do_not_block() {
        let registry = LockRegistry::new();
        let _policy = registry.acquire(names::POLICY).await;
        let role = tokio::time::timeout(Duration::from_secs(1), registry.acquire(names::ROLE)).await;
        assert!(role.is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_lock_released_on_drop() {
        let registry = LockRegistry::new();
        drop(registry.acquire("app-123").await);
        let again = tokio::time::timeout(Duration::from_secs(1), registry.acquire("app-123")).await;
        assert!(again.is_ok());
    }
}
