use super::types::{NodeId, Peer};

use dashmap::DashMap;

/// Concurrency-safe mapping of peer id to address.
///
/// Lives in its own lock domain: nothing here is ever touched while a
/// partition lock is held, and fan-outs work from a `snapshot` so later
/// membership changes do not affect replication already in flight.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: DashMap<NodeId, String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a peer or replaces its address. Returns the previous address.
    pub fn add(&self, id: NodeId, address: String) -> Option<String> {
        let previous = self.peers.insert(id.clone(), address.clone());
        match &previous {
            Some(old) => tracing::info!("Peer {} moved {} -> {}", id, old, address),
            None => tracing::info!("Added peer {} at {}", id, address),
        }
        previous
    }

    pub fn remove(&self, id: &NodeId) -> Option<String> {
        let removed = self.peers.remove(id).map(|(_, address)| address);
        if removed.is_some() {
            tracing::info!("Removed peer {}", id);
        }
        removed
    }

    pub fn get(&self, id: &NodeId) -> Option<String> {
        self.peers.get(id).map(|entry| entry.value().clone())
    }

    /// Point-in-time copy of the registry, sorted by id.
    pub fn snapshot(&self) -> Vec<Peer> {
        let mut peers: Vec<Peer> = self
            .peers
            .iter()
            .map(|entry| Peer {
                id: entry.key().clone(),
                address: entry.value().clone(),
            })
            .collect();
        peers.sort_by(|a, b| a.id.cmp(&b.id));
        peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
