//! Per-faction write serialization
//!
//! Factions run their turns concurrently, but each faction's memory row has a
//! single writer at a time. A guard is held for a whole load-modify-save cycle.

use std::sync::{Arc, Mutex};

use ahash::AHashMap;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct FactionLocks {
    locks: Mutex<AHashMap<String, Arc<AsyncMutex<()>>>>,
}

impl FactionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `faction`'s memory row
    pub async fn acquire(&self, faction: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(faction.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_faction_is_exclusive() {
        let locks = FactionLocks::new();
        let guard = locks.acquire("Carthage").await;

        let lock = {
            let map = locks.locks.lock().unwrap();
            map.get("Carthage").unwrap().clone()
        };
        assert!(lock.try_lock().is_err());

        drop(guard);
        assert!(lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_different_factions_do_not_block() {
        let locks = FactionLocks::new();
        let _a = locks.acquire("Carthage").await;
        let _b = locks.acquire("Gaul").await;
    }
}
