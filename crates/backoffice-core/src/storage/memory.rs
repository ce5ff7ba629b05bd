use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{DurableStorage, StorageBatch};

/// Process-local storage. Readers load an immutable snapshot of the whole
/// map, so batches are never observed half-applied.
#[derive(Default)]
pub struct MemoryStorage {
    map: ArcSwap<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            map: ArcSwap::from_pointee(map),
        }
    }

    pub fn len(&self) -> usize {
        self.map.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.load().is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.load().get(key).cloned()
    }

    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>> {
        let snap = self.map.load();
        keys.iter().map(|k| snap.get(*k).cloned()).collect()
    }

    fn apply(&self, batch: StorageBatch) {
        if batch.is_empty() {
            return;
        }
        self.map.rcu(|current| {
            let mut next = HashMap::clone(current);
            batch.apply_to(&mut next);
            Arc::new(next)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStorage::new();
        assert!(store.is_available());
        assert_eq!(store.get_item("k"), None);

        store.set_item("k", "v");
        assert_eq!(store.get_item("k").as_deref(), Some("v"));

        store.remove_item("k");
        assert!(store.is_empty());
    }

    #[test]
    fn batch_is_visible_as_a_whole() {
        let store = MemoryStorage::with_entries([("auth_token", "old")]);
        store.apply(
            StorageBatch::new()
                .set("auth_token", "new")
                .set("current_user", "{}"),
        );
        assert_eq!(
            store.get_items(&["auth_token", "current_user"]),
            vec![Some("new".to_string()), Some("{}".to_string())]
        );
        assert_eq!(store.len(), 2);
    }
}
