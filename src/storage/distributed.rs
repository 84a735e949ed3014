//! Ring Replication
//!
//! `DistributedStore` writes every key to its primary partition and then to
//! the `replication_factor` partitions that follow it by index. Each copy is
//! written under that partition's own lock; there is no store-wide lock, so a
//! concurrent reader may see the primary updated before the replicas.
//!
//! Reads only ever touch the primary partition.

use super::partitioner::PartitionMap;
use super::types::{validate_key, KvStore, StoreError, Value};

pub struct DistributedStore {
    partition_map: PartitionMap,
    replication_factor: usize,
}

impl DistributedStore {
    pub fn new(
        partition_count: usize,
        virtual_nodes: usize,
        replication_factor: usize,
    ) -> Result<Self, StoreError> {
        let partition_map = PartitionMap::new(partition_count, virtual_nodes)?;
        if replication_factor >= partition_count {
            return Err(StoreError::Config(format!(
                "replication factor {} must be less than partition count {}",
                replication_factor, partition_count
            )));
        }

        tracing::info!(
            "Distributed store ready: {} partitions, {} virtual nodes each, replication factor {}",
            partition_count,
            virtual_nodes,
            replication_factor
        );

        Ok(Self {
            partition_map,
            replication_factor,
        })
    }

    pub fn partition_map(&self) -> &PartitionMap {
        &self.partition_map
    }

    /// Primary partition first, then the ring-replication successors.
    pub fn replica_partitions(&self, key: &str) -> Vec<usize> {
        let primary = self.partition_map.get_partition(key);
        self.partition_map
            .successors(primary, self.replication_factor)
    }

    pub fn get(&self, key: &str) -> Result<Value, StoreError> {
        validate_key(key)?;
        self.partition_map.get(key)
    }

    pub fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        validate_key(key)?;
        let primary = self.partition_map.put(key.to_string(), value.clone())?;

        for replica in self
            .partition_map
            .successors(primary, self.replication_factor)
            .into_iter()
            .skip(1)
        {
            self.partition_map
                .partition(replica)?
                .insert(key.to_string(), value.clone());
        }

        tracing::debug!(
            "PUT: key {} stored in partition {} (+{} replicas)",
            key,
            primary,
            self.replication_factor
        );
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        let primary = self.partition_map.get_partition(key);
        let existed = self.partition_map.delete(key)?;

        for replica in self
            .partition_map
            .successors(primary, self.replication_factor)
            .into_iter()
            .skip(1)
        {
            self.partition_map.partition(replica)?.remove(key);
        }

        tracing::debug!(
            "DELETE: key {} from partition {} (existed={})",
            key,
            primary,
            existed
        );
        Ok(existed)
    }
}

impl KvStore for DistributedStore {
    fn get(&self, key: &str) -> Result<Value, StoreError> {
        DistributedStore::get(self, key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.put(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        DistributedStore::delete(self, key)
    }

    fn partition_counts(&self) -> Vec<usize> {
        self.partition_map.stats()
    }
}
