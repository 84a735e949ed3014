//! Consistent Hash Ring
//!
//! Maps keys onto a fixed set of partitions. Each partition is placed on the
//! ring `virtual_nodes` times under the synthetic label `P{partition}-V{vnode}`,
//! which spreads ownership of the hash space evenly.
//!
//! The ring is built once, sorted, and never mutated afterwards, so lookups
//! need no locking.

use super::types::StoreError;

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingEntry {
    pub hash: u32,
    pub partition: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRing {
    entries: Vec<RingEntry>,
}

/// First four bytes of the SHA-256 digest, big-endian.
pub fn hash_key(key: &str) -> u32 {
    let digest = Sha256::digest(key.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

fn vnode_label(partition: usize, vnode: usize) -> String {
    format!("P{}-V{}", partition, vnode)
}

impl HashRing {
    /// Builds the ring for `partition_count` partitions with `virtual_nodes`
    /// positions each. With `virtual_nodes == 1` every partition gets a single
    /// position.
    ///
    /// Entries with colliding hashes are all kept; the sort is stable so the
    /// one inserted first wins lookups.
    pub fn build(partition_count: usize, virtual_nodes: usize) -> Result<Self, StoreError> {
        if partition_count == 0 {
            return Err(StoreError::Config(
                "partition count must be at least 1".to_string(),
            ));
        }
        if virtual_nodes == 0 {
            return Err(StoreError::Config(
                "virtual nodes per partition must be at least 1".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(partition_count * virtual_nodes);
        for partition in 0..partition_count {
            for vnode in 0..virtual_nodes {
                entries.push(RingEntry {
                    hash: hash_key(&vnode_label(partition, vnode)),
                    partition,
                });
            }
        }
        entries.sort_by_key(|entry| entry.hash);

        tracing::debug!(
            "Built hash ring: {} partitions x {} virtual nodes",
            partition_count,
            virtual_nodes
        );

        Ok(Self { entries })
    }

    /// Successor rule: first entry with `hash >= hash(key)`, wrapping to the
    /// start of the ring past the largest entry.
    pub fn lookup(&self, key: &str) -> usize {
        let hash = hash_key(key);
        let idx = self.entries.partition_point(|entry| entry.hash < hash);
        let idx = if idx == self.entries.len() { 0 } else { idx };
        self.entries[idx].partition
    }

    pub fn entries(&self) -> &[RingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
