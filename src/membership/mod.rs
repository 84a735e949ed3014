//! Peer Membership Module
//!
//! Tracks the other nodes this node replicates its writes to. Peers are added
//! and removed administratively (over `/peers` or at startup from
//! configuration); there is no automatic discovery or failure detection.
//!
//! ## Core Pieces
//! - **`types`**: `NodeId` and `Peer` (id + HTTP address).
//! - **`registry`**: `PeerRegistry`, a concurrent map with its own lock domain,
//!   independent from partition data.
//! - **`handlers`**: admin HTTP endpoints for listing, adding and removing peers.

pub mod handlers;
pub mod registry;
pub mod types;
