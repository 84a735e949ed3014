use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Another node this one replicates to.
///
/// `address` is `host:port` of the peer's HTTP listener. Holding a `Peer`
/// says nothing about the peer's lifecycle; it is only a replication target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Peer {
    pub id: NodeId,
    pub address: String,
}

impl Peer {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: NodeId(id.into()),
            address: address.into(),
        }
    }

    /// Base URL for requests to this peer. Addresses given without a scheme
    /// are treated as plain HTTP.
    pub fn base_url(&self) -> String {
        crate::client::normalize_base_url(&self.address)
    }
}
