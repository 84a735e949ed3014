use super::partition::Partition;
use super::ring::HashRing;
use super::types::{Key, StoreError, Value};

/// Owns the fixed set of partitions and the ring that routes keys to them.
pub struct PartitionMap {
    partitions: Vec<Partition>,
    ring: HashRing,
}

impl PartitionMap {
    pub fn new(partition_count: usize, virtual_nodes: usize) -> Result<Self, StoreError> {
        let ring = HashRing::build(partition_count, virtual_nodes)?;
        let partitions = (0..partition_count).map(|_| Partition::new()).collect();

        Ok(Self { partitions, ring })
    }

    pub fn get_partition(&self, key: &str) -> usize {
        self.ring.lookup(key)
    }

    /// `primary` followed by the next `replicas` partitions, modulo the
    /// partition count.
    pub fn successors(&self, primary: usize, replicas: usize) -> Vec<usize> {
        let count = self.partitions.len();
        (0..=replicas).map(|i| (primary + i) % count).collect()
    }

    pub fn partition(&self, index: usize) -> Result<&Partition, StoreError> {
        self.partitions.get(index).ok_or_else(|| {
            StoreError::Internal(format!(
                "partition {} out of range (count {})",
                index,
                self.partitions.len()
            ))
        })
    }

    pub fn get(&self, key: &str) -> Result<Value, StoreError> {
        let index = self.get_partition(key);
        self.partition(index)?
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    pub fn put(&self, key: Key, value: Value) -> Result<usize, StoreError> {
        let index = self.get_partition(&key);
        self.partition(index)?.insert(key, value);
        Ok(index)
    }

    pub fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let index = self.get_partition(key);
        Ok(self.partition(index)?.remove(key).is_some())
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn stats(&self) -> Vec<usize> {
        self.partitions.iter().map(Partition::len).collect()
    }
}
