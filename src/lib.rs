//! Partitioned Key-Value Store Node
//!
//! A node owns a shard of a keyspace, serves it over HTTP, and copies every
//! write to additional partitions and to peer nodes.
//!
//! ## Modules
//! - **`storage`**: the placement and storage engine. A consistent-hash ring
//!   (`HashRing`) routes keys to fixed, independently locked partitions
//!   (`PartitionMap`); `DistributedStore` adds ring replication to the next
//!   R partitions. `LocalStore` is the unpartitioned alternative.
//! - **`membership`**: the peer registry (id -> address), mutated administratively.
//! - **`node`**: `Node` ties a store to its peers and fans writes out to them
//!   as detached, best-effort tasks.
//! - **`client`**: HTTP client for the node API, used by `kvctl` and for
//!   peer replication.
//! - **`server`**: axum router and listener.
//! - **`config`** / **`logging`**: process configuration and tracing setup.

pub mod client;
pub mod config;
pub mod logging;
pub mod membership;
pub mod node;
pub mod server;
pub mod storage;
