//! Keyed Lock Registry
//!
//! Per-key advisory locks used to collapse concurrent misses on the same
//! cache key into a single compute. Slots are reference counted and removed
//! when the last holder releases, so the registry does not grow with the
//! key space.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

// == Lock Slot ==
#[derive(Debug, Default)]
struct Slot {
    /// The advisory lock for one derived key
    lock: Arc<AsyncMutex<()>>,
    /// Holders plus waiters currently interested in this key
    holders: usize,
}

// == Keyed Locks ==
/// Registry of per-key advisory locks.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<String, Slot>>,
}

impl KeyedLocks {
    // == Constructor ==
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().expect("keyed lock registry poisoned")
    }

    // == Acquire ==
    /// Acquires the advisory lock for `key`, waiting if another caller
    /// holds it.
    ///
    /// The returned guard releases the lock and drops the slot's holder
    /// count on drop. The holder count is released even when the caller is
    /// cancelled while still waiting, so abandoned waiters cannot leak
    /// slots.
    pub async fn acquire(&self, key: &str) -> KeyGuard<'_> {
        let lock = {
            let mut slots = self.locked();
            let slot = slots.entry(key.to_string()).or_default();
            slot.holders += 1;
            Arc::clone(&slot.lock)
        };

        // The guard exists before the await so cancellation during the
        // wait still runs its Drop and releases the holder count.
        let mut guard = KeyGuard {
            _inner: None,
            key: key.to_string(),
            registry: self,
        };
        guard._inner = Some(lock.lock_owned().await);
        guard
    }

    // == Active Keys ==
    /// Returns the number of keys with a live slot.
    pub fn active_keys(&self) -> usize {
        self.locked().len()
    }
}

// == Key Guard ==
/// Holds the advisory lock for one key until dropped.
#[derive(Debug)]
pub struct KeyGuard<'a> {
    _inner: Option<OwnedMutexGuard<()>>,
    key: String,
    registry: &'a KeyedLocks,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self.registry.locked();
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.holders -= 1;
            if slot.holders == 0 {
                slots.remove(&self.key);
            }
        }
    }
}
