// ── Durable key/value storage ──
//
// Where the session survives between runs. Storage is best-effort: an
// unavailable backend reads as empty and swallows writes, and no method
// ever returns an error to the caller.

mod detached;
mod file;
mod memory;

pub use detached::DetachedStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Key holding the JSON-serialized [`Identity`](crate::Identity).
pub const IDENTITY_KEY: &str = "current_user";

/// One step of a [`StorageBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set { key: String, value: String },
    Remove { key: String },
}

/// A group of writes applied as a single unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageBatch {
    ops: Vec<StorageOp>,
}

impl StorageBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(StorageOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push(StorageOp::Remove { key: key.into() });
        self
    }

    pub fn ops(&self) -> &[StorageOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay the batch onto a plain map.
    pub(crate) fn apply_to(&self, map: &mut std::collections::HashMap<String, String>) {
        for op in &self.ops {
            match op {
                StorageOp::Set { key, value } => {
                    map.insert(key.clone(), value.clone());
                }
                StorageOp::Remove { key } => {
                    map.remove(key);
                }
            }
        }
    }
}

/// A string key/value store that outlives the process (or pretends to).
///
/// Implementations must make [`apply`](Self::apply) atomic: a concurrent
/// reader observes either none or all of a batch's writes.
pub trait DurableStorage: Send + Sync {
    /// Whether writes will actually be kept.
    fn is_available(&self) -> bool {
        true
    }

    fn get_item(&self, key: &str) -> Option<String>;

    /// Read several keys from one consistent snapshot.
    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>> {
        keys.iter().map(|k| self.get_item(k)).collect()
    }

    fn apply(&self, batch: StorageBatch);

    fn set_item(&self, key: &str, value: &str) {
        self.apply(StorageBatch::new().set(key, value));
    }

    fn remove_item(&self, key: &str) {
        self.apply(StorageBatch::new().remove(key));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn batch_applies_in_order() {
        let mut map = HashMap::new();
        StorageBatch::new()
            .set("a", "1")
            .set("b", "2")
            .remove("a")
            .set("b", "3")
            .apply_to(&mut map);

        assert_eq!(map.get("a"), None);
        assert_eq!(map.get("b").map(String::as_str), Some("3"));
    }
}
