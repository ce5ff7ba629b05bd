use tracing::trace;

use super::{DurableStorage, StorageBatch};

/// Storage for environments without a durable backend: reads are always
/// absent and writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStorage;

impl DurableStorage for DetachedStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn apply(&self, batch: StorageBatch) {
        trace!(ops = batch.ops().len(), "storage unavailable, dropping writes");
    }
}
