use thiserror::Error;

/// Opaque key. Used as the consistent-hash input.
pub type Key = String;

/// Opaque payload stored under a key.
pub type Value = String;

/// Failures surfaced by the primary path of a store operation.
///
/// Replication faults never appear here; they stay inside the replication
/// task and are only logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(Key),

    #[error("key must not be empty")]
    InvalidKey,

    #[error("invalid store configuration: {0}")]
    Config(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// The operations a `Node` needs from whatever store backs it.
///
/// Implemented by `DistributedStore` (partitioned, ring-replicated) and by
/// `LocalStore` (single unpartitioned map).
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Value, StoreError>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Returns whether the key was present. A missing key is not an error.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Number of entries per partition, primary and replica copies included.
    fn partition_counts(&self) -> Vec<usize>;
}

pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey);
    }
    Ok(())
}
