//! Storage Network Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) used by clients
//! and by peer nodes. Nodes replicate to each other over exactly the same
//! routes clients use; a replicated request is only distinguished by the
//! `x-replicated-from` header.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Read a key: `GET /get?key=K`.
pub const ENDPOINT_GET: &str = "/get";
/// Write a key: `POST|PUT /set` with a JSON `KeyValue` body.
pub const ENDPOINT_SET: &str = "/set";
/// Delete a key: `DELETE /delete?key=K`.
pub const ENDPOINT_DELETE: &str = "/delete";
/// Path-addressed form: `GET|POST|PUT|DELETE /{key}` with a plain-text body.
/// Also served as `/kv/{key}`, which reaches keys that share a name with one
/// of the fixed routes.
pub const ENDPOINT_KV: &str = "/kv";
/// List (`GET`) or register (`POST`) peers; `DELETE /peers/{id}` removes one.
pub const ENDPOINT_PEERS: &str = "/peers";
/// Node statistics.
pub const ENDPOINT_STATS: &str = "/stats";
/// Liveness probe.
pub const ENDPOINT_HEALTH: &str = "/health";

/// Header carrying the id of the node that originated a replicated write.
/// A node receiving it applies the write locally and does not fan it out again.
pub const HEADER_REPLICATED_FROM: &str = "x-replicated-from";

// --- Data Transfer Objects ---

/// A key together with its value. Body of `/set` and of `/get` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// Query string of `/get` and `/delete`. The key is optional so that a
/// missing key is reported as 400 rather than rejected by the extractor.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

/// Error body returned alongside every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Acknowledgment for write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
}

/// Response of `/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub node_id: String,
    pub address: String,
    pub peer_count: usize,
    /// Entries held by each partition, replica copies included.
    pub partitions: Vec<usize>,
}
