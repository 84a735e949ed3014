use super::types::{Key, Value};

use parking_lot::RwLock;
use std::collections::HashMap;

/// One shard of the keyspace with its own reader/writer lock.
///
/// Every method takes and releases the lock before returning, so no guard
/// ever escapes into async code.
#[derive(Debug, Default)]
pub struct Partition {
    data: RwLock<HashMap<Key, Value>>,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    pub fn insert(&self, key: Key, value: Value) -> Option<Value> {
        self.data.write().insert(key, value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.data.write().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
