//! Node Module
//!
//! Ties a local store to the peer registry and propagates every successful
//! mutation to the registered peers.
//!
//! ## Flow
//! 1. A write is validated and applied to the local store (a ring-replicated
//!    `DistributedStore` or a plain `LocalStore`).
//! 2. The peer registry is snapshotted and one detached task per peer repeats
//!    the write against that peer's `/set` or `/delete` endpoint.
//! 3. The caller gets the local result immediately. Replication outcomes are
//!    only logged.
//!
//! ## Submodules
//! - **`service`**: the `Node` itself.
//! - **`replication`**: `PeerTransport` seam, HTTP transport and the fan-out.

pub mod replication;
pub mod service;
