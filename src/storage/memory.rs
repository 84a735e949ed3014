use super::partition::Partition;
use super::types::{validate_key, KvStore, StoreError, Value};

/// Unpartitioned in-memory store: one map behind one lock.
///
/// Used when a node runs without a partition ring and relies only on peer
/// replication for redundancy.
#[derive(Debug, Default)]
pub struct LocalStore {
    data: Partition,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvStore for LocalStore {
    fn get(&self, key: &str) -> Result<Value, StoreError> {
        validate_key(key)?;
        match self.data.get(key) {
            Some(value) => Ok(value),
            None => {
                tracing::debug!("GET: key {} not found", key);
                Err(StoreError::NotFound(key.to_string()))
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        validate_key(key)?;
        self.data.insert(key.to_string(), value);
        tracing::debug!("SET: key {}", key);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.data.remove(key).is_some())
    }

    fn partition_counts(&self) -> Vec<usize> {
        vec![self.data.len()]
    }
}
