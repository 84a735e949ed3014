//! Peer Replication
//!
//! Fire-and-forget propagation of writes to other nodes. One detached tokio
//! task is spawned per peer; each task issues a single request, bounded by a
//! timeout, and logs the outcome. Nothing is retried and nothing flows back
//! to the request that triggered the fan-out.

use crate::client::KvClient;
use crate::membership::types::{NodeId, Peer};
use crate::storage::types::{Key, Value};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const DEFAULT_REPLICATION_TIMEOUT: Duration = Duration::from_secs(2);

/// A mutation to repeat on a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicationOp {
    Set { key: Key, value: Value },
    Delete { key: Key },
}

impl ReplicationOp {
    pub fn key(&self) -> &str {
        match self {
            ReplicationOp::Set { key, .. } => key,
            ReplicationOp::Delete { key } => key,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReplicationOp::Set { .. } => "set",
            ReplicationOp::Delete { .. } => "delete",
        }
    }
}

/// Delivers one replicated operation to one peer.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn send(&self, origin: &NodeId, peer: &Peer, op: &ReplicationOp) -> Result<()>;
}

/// Replicates over HTTP using the same `/set` and `/delete` routes clients use.
pub struct HttpTransport {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICATION_TIMEOUT)
    }
}

#[async_trait]
impl PeerTransport for HttpTransport {
    async fn send(&self, origin: &NodeId, peer: &Peer, op: &ReplicationOp) -> Result<()> {
        let client = KvClient::with_http_client(&peer.base_url(), self.http_client.clone())
            .with_timeout(self.timeout)
            .replicated_from(origin.clone());

        match op {
            ReplicationOp::Set { key, value } => client.set(key, value).await,
            ReplicationOp::Delete { key } => {
                // The peer may never have had the key; that is still a success.
                client.delete(key).await.map(|_| ())
            }
        }
    }
}

/// Spawns replication tasks on a tokio runtime.
///
/// The runtime is captured when the replicator is built, so a `Node` created
/// inside a runtime keeps replicating even when its writes come from plain
/// threads. A replicator built outside any runtime falls back to the
/// caller's runtime at fan-out time; use `with_runtime` to pin one instead.
pub struct PeerReplicator {
    transport: Arc<dyn PeerTransport>,
    timeout: Duration,
    runtime: Option<Handle>,
}

impl PeerReplicator {
    pub fn new(transport: Arc<dyn PeerTransport>, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn http(timeout: Duration) -> Self {
        Self::new(Arc::new(HttpTransport::new(timeout)), timeout)
    }

    /// Spawns one task per peer and returns their handles without waiting.
    ///
    /// Dropping the handles detaches the tasks. With no captured runtime and
    /// none on the calling thread, nothing is spawned and an error is logged.
    pub fn fan_out(
        &self,
        origin: &NodeId,
        peers: Vec<Peer>,
        op: ReplicationOp,
    ) -> Vec<JoinHandle<()>> {
        if peers.is_empty() {
            return Vec::new();
        }

        let runtime = match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(handle) => handle,
            None => {
                tracing::error!(
                    "No async runtime, {} of {} not replicated to {} peers",
                    op.kind(),
                    op.key(),
                    peers.len()
                );
                return Vec::new();
            }
        };

        let op = Arc::new(op);
        peers
            .into_iter()
            .map(|peer| {
                let transport = self.transport.clone();
                let origin = origin.clone();
                let op = op.clone();
                let timeout = self.timeout;

                runtime.spawn(async move {
                    let result =
                        tokio::time::timeout(timeout, transport.send(&origin, &peer, &op)).await;
                    match result {
                        Ok(Ok(())) => {
                            tracing::debug!(
                                "Replicated {} of {} to {} ({})",
                                op.kind(),
                                op.key(),
                                peer.id,
                                peer.address
                            );
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(
                                "Replication {} of {} to {} ({}) failed: {}",
                                op.kind(),
                                op.key(),
                                peer.id,
                                peer.address,
                                e
                            );
                        }
                        Err(_) => {
                            tracing::warn!(
                                "Replication {} of {} to {} ({}) timed out after {:?}",
                                op.kind(),
                                op.key(),
                                peer.id,
                                peer.address,
                                timeout
                            );
                        }
                    }
                })
            })
            .collect()
    }
}
