use super::replication::{PeerReplicator, ReplicationOp};
use crate::membership::registry::PeerRegistry;
use crate::membership::types::{NodeId, Peer};
use crate::storage::types::{validate_key, KvStore, StoreError, Value};

use std::sync::Arc;

/// A store node: local storage plus best-effort replication to peers.
///
/// Every mutation is applied to the local store first and its result is
/// what the caller sees. Peer replication is spawned afterwards and never
/// awaited. Build the node inside a tokio runtime (or give its replicator
/// one with `PeerReplicator::with_runtime`) so those tasks have somewhere
/// to run.
pub struct Node {
    pub id: NodeId,
    pub address: String,
    store: Arc<dyn KvStore>,
    peers: PeerRegistry,
    replicator: PeerReplicator,
}

impl Node {
    pub fn new(
        id: NodeId,
        address: impl Into<String>,
        store: Arc<dyn KvStore>,
        replicator: PeerReplicator,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            address: address.into(),
            store,
            peers: PeerRegistry::new(),
            replicator,
        })
    }

    pub fn get(&self, key: &str) -> Result<Value, StoreError> {
        self.store.get(key)
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.apply_set(key, value.clone())?;
        self.replicate(ReplicationOp::Set {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    /// Returns whether the key existed locally. Peers are asked to delete the
    /// key either way, since they may hold it even when this node does not.
    pub fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let existed = self.apply_delete(key)?;
        self.replicate(ReplicationOp::Delete {
            key: key.to_string(),
        });
        Ok(existed)
    }

    /// Applies a write received from another node. Not fanned out again.
    pub fn apply_replica_set(
        &self,
        origin: &NodeId,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        tracing::debug!("Applying replicated set of {} from {}", key, origin);
        self.apply_set(key, value)
    }

    /// Applies a delete received from another node. Not fanned out again.
    pub fn apply_replica_delete(
        &self,
        origin: &NodeId,
        key: &str,
    ) -> Result<bool, StoreError> {
        tracing::debug!("Applying replicated delete of {} from {}", key, origin);
        self.apply_delete(key)
    }

    /// Registers or re-addresses a peer. Returns false, registering nothing,
    /// when `id` is this node's own id.
    pub fn add_peer(&self, id: NodeId, address: String) -> bool {
        if id == self.id {
            tracing::warn!("Ignoring request to add self ({}) as a peer", id);
            return false;
        }
        self.peers.add(id, address);
        true
    }

    pub fn remove_peer(&self, id: &NodeId) -> Option<String> {
        self.peers.remove(id)
    }

    pub fn peers(&self) -> Vec<Peer> {
        self.peers.snapshot()
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn partition_counts(&self) -> Vec<usize> {
        self.store.partition_counts()
    }

    fn apply_set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        validate_key(key)?;
        self.store.set(key, value).map_err(|e| {
            tracing::error!("Error setting {} in store: {}", key, e);
            e
        })
    }

    fn apply_delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        self.store.delete(key)
    }

    fn replicate(&self, op: ReplicationOp) {
        // Snapshot first: the registry lock is released before any task runs.
        let peers = self.peers.snapshot();
        let spawned = self.replicator.fan_out(&self.id, peers, op).len();
        if spawned > 0 {
            tracing::debug!("Spawned {} peer replication tasks", spawned);
        }
    }
}
