//! Storage Module
//!
//! Implements a partitioned, ring-replicated in-memory key-value store.
//!
//! ## Core Concepts
//! - **Partitioning**: A fixed number of partitions, each a map behind its own
//!   reader/writer lock (`partition`).
//! - **Placement**: A consistent-hash ring with virtual nodes maps every key to
//!   exactly one primary partition (`ring`, `partitioner`).
//! - **Replication**: `DistributedStore` copies each write to the R partitions
//!   following the primary, synchronously and without a global lock.
//! - **Access**: Reads go to the primary partition only.

pub mod distributed;
pub mod handlers;
pub mod memory;
pub mod partition;
pub mod partitioner;
pub mod protocol;
pub mod ring;
pub mod types;

#[cfg(test)]
mod tests;
