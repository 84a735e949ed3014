//! Node Configuration
//!
//! Every setting can be given as a command-line flag or through the matching
//! `KV_*` environment variable. Invalid combinations (no partitions, a
//! replication factor that does not fit in the ring) are rejected before the
//! node starts.

use crate::logging::LogLevel;
use crate::membership::types::{NodeId, Peer};
use crate::node::replication::PeerReplicator;
use crate::node::service::Node;
use crate::storage::distributed::DistributedStore;
use crate::storage::memory::LocalStore;
use crate::storage::types::{KvStore, StoreError};

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PARTITIONS: usize = 10;
pub const DEFAULT_VIRTUAL_NODES: usize = 100;
pub const DEFAULT_REPLICATION_FACTOR: usize = 3;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum StoreKind {
    /// Consistent-hash partitions with ring replication.
    Distributed,
    /// A single unpartitioned map.
    Local,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Partitioned, replicated key-value store node", version)]
pub struct NodeConfig {
    /// Node id. A random UUID is used when omitted.
    #[arg(long, env = "KV_NODE_ID")]
    pub id: Option<String>,

    /// Address the HTTP server binds to.
    #[arg(long, short = 'b', env = "KV_BIND", default_value = "127.0.0.1:9090")]
    pub bind: SocketAddr,

    /// Address peers should use to reach this node. Defaults to the bind address.
    #[arg(long, env = "KV_ADVERTISE")]
    pub advertise: Option<String>,

    #[arg(long, value_enum, env = "KV_STORE", default_value_t = StoreKind::Distributed)]
    pub store: StoreKind,

    #[arg(long, env = "KV_PARTITIONS", default_value_t = DEFAULT_PARTITIONS)]
    pub partitions: usize,

    #[arg(long, env = "KV_VIRTUAL_NODES", default_value_t = DEFAULT_VIRTUAL_NODES)]
    pub virtual_nodes: usize,

    /// Extra partitions (ring successors) that receive a copy of every write.
    #[arg(long, env = "KV_REPLICATION_FACTOR", default_value_t = DEFAULT_REPLICATION_FACTOR)]
    pub replication_factor: usize,

    /// Peer to replicate to, as `id=host:port`. Repeatable.
    #[arg(long = "peer", env = "KV_PEERS", value_delimiter = ',', value_parser = parse_peer)]
    pub peers: Vec<Peer>,

    /// Upper bound for a single peer replication call, in milliseconds.
    #[arg(long, env = "KV_REPLICATION_TIMEOUT_MS", default_value_t = 2000)]
    pub replication_timeout_ms: u64,

    #[arg(long, value_enum, env = "KV_LOG_LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

pub fn parse_peer(raw: &str) -> Result<Peer, String> {
    match raw.split_once('=') {
        Some((id, address)) if !id.trim().is_empty() && !address.trim().is_empty() => {
            Ok(Peer::new(id.trim(), address.trim()))
        }
        _ => Err(format!("expected `id=host:port`, got `{}`", raw)),
    }
}

impl NodeConfig {
    pub fn node_id(&self) -> NodeId {
        match &self.id {
            Some(id) => NodeId(id.clone()),
            None => NodeId::new(),
        }
    }

    pub fn advertised_address(&self) -> String {
        self.advertise
            .clone()
            .unwrap_or_else(|| self.bind.to_string())
    }

    pub fn replication_timeout(&self) -> Duration {
        Duration::from_millis(self.replication_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.store == StoreKind::Local {
            return Ok(());
        }
        if self.partitions == 0 {
            return Err(StoreError::Config(
                "partition count must be at least 1".to_string(),
            ));
        }
        if self.virtual_nodes == 0 {
            return Err(StoreError::Config(
                "virtual nodes per partition must be at least 1".to_string(),
            ));
        }
        if self.replication_factor >= self.partitions {
            return Err(StoreError::Config(format!(
                "replication factor {} must be less than partition count {}",
                self.replication_factor, self.partitions
            )));
        }
        Ok(())
    }

    pub fn build_store(&self) -> Result<Arc<dyn KvStore>, StoreError> {
        self.validate()?;
        let store: Arc<dyn KvStore> = match self.store {
            StoreKind::Distributed => Arc::new(DistributedStore::new(
                self.partitions,
                self.virtual_nodes,
                self.replication_factor,
            )?),
            StoreKind::Local => Arc::new(LocalStore::new()),
        };
        Ok(store)
    }

    /// Builds the node with its store, HTTP replicator and initial peers.
    pub fn build_node(&self) -> Result<Arc<Node>, StoreError> {
        let store = self.build_store()?;
        let node = Node::new(
            self.node_id(),
            self.advertised_address(),
            store,
            PeerReplicator::http(self.replication_timeout()),
        );

        for peer in &self.peers {
            node.add_peer(peer.id.clone(), peer.address.clone());
        }

        Ok(node)
    }
}
