//! HTTP surface of a node.

use crate::membership::handlers::{handle_add_peer, handle_list_peers, handle_remove_peer};
use crate::node::service::Node;
use crate::storage::handlers::*;
use crate::storage::protocol::{
    ENDPOINT_DELETE, ENDPOINT_GET, ENDPOINT_HEALTH, ENDPOINT_KV, ENDPOINT_PEERS, ENDPOINT_SET,
    ENDPOINT_STATS,
};

use anyhow::Result;
use axum::{
    extract::Extension,
    routing::{delete, get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;

fn kv_routes() -> MethodRouter {
    get(handle_kv_get)
        .post(handle_kv_put)
        .put(handle_kv_put)
        .delete(handle_kv_delete)
}

pub fn router(node: Arc<Node>) -> Router {
    Router::new()
        .route(ENDPOINT_GET, get(handle_get))
        .route(ENDPOINT_SET, post(handle_set).put(handle_set))
        .route(ENDPOINT_DELETE, delete(handle_delete))
        .route(&format!("{}/:key", ENDPOINT_KV), kv_routes())
        .route(ENDPOINT_PEERS, get(handle_list_peers).post(handle_add_peer))
        .route(&format!("{}/:id", ENDPOINT_PEERS), delete(handle_remove_peer))
        .route(ENDPOINT_STATS, get(handle_stats))
        .route(ENDPOINT_HEALTH, get(handle_health))
        // Static routes above take priority; any other single segment is a key.
        .route("/:key", kv_routes())
        .layer(Extension(node))
}

/// Serves the node API on an already bound listener until the server fails.
pub async fn serve(listener: TcpListener, node: Arc<Node>) -> Result<()> {
    tracing::info!(
        "Node {} HTTP server listening on {}",
        node.id,
        listener.local_addr()?
    );
    axum::serve(listener, router(node)).await?;
    Ok(())
}
