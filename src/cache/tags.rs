//! Tag Index Module
//!
//! Maintains, for each tag, the set of cache keys currently associated with
//! it. Membership is tracked exactly rather than approximated by key-pattern
//! scans, so group invalidation touches only the keys that carry the tag.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

// == Tag Index ==
/// Exact tag-to-keys membership index.
///
/// A key appears under a tag iff it was stored with that tag and has not
/// since been invalidated or expired. A single interior mutex serializes
/// `clear_tag` against `associate`, so a key added during a clear ends up
/// fully present or fully absent.
#[derive(Debug, Default)]
pub struct TagIndex {
    /// Tag name to the set of keys carrying it
    tags: Mutex<HashMap<String, HashSet<String>>>,
}

impl TagIndex {
    // == Constructor ==
    /// Creates a new empty TagIndex.
    pub fn new() -> Self {
        Self {
            tags: Mutex::new(HashMap::new()),
        }
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<String, HashSet<String>>> {
        self.tags.lock().expect("tag index lock poisoned")
    }

    // == Associate ==
    /// Adds `key` to each tag's set. Idempotent.
    pub fn associate(&self, tags: &[&str], key: &str) {
        let mut map = self.locked();
        for tag in tags {
            map.entry(tag.to_string())
                .or_default()
                .insert(key.to_string());
        }
    }

    // == Keys For Tag ==
    /// Returns the current membership of `tag`; empty set if unknown.
    pub fn keys_for_tag(&self, tag: &str) -> HashSet<String> {
        let map = self.locked();
        map.get(tag).cloned().unwrap_or_default()
    }

    // == Clear Tag ==
    /// Atomically returns and removes all keys under `tag`.
    pub fn clear_tag(&self, tag: &str) -> HashSet<String> {
        let mut map = self.locked();
        map.remove(tag).unwrap_or_default()
    }

    // == Contains ==
    /// Checks whether `key` is currently recorded under `tag`.
    pub fn contains(&self, tag: &str, key: &str) -> bool {
        let map = self.locked();
        map.get(tag).is_some_and(|keys| keys.contains(key))
    }

    // == Dissociate ==
    /// Removes `key` from every tag it is recorded under.
    ///
    /// Called when an entry leaves the store for any reason (invalidation,
    /// expiry, decode failure) so stale memberships do not accumulate.
    pub fn dissociate(&self, key: &str) {
        let mut map = self.locked();
        for keys in map.values_mut() {
            keys.remove(key);
        }
        map.retain(|_, keys| !keys.is_empty());
    }

    // == Tag Count ==
    /// Returns the number of tags with at least one member.
    pub fn tag_count(&self) -> usize {
        self.locked().len()
    }
}
