use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::types::{NodeId, Peer};
use crate::node::service::Node;

pub async fn handle_list_peers(Extension(node): Extension<Arc<Node>>) -> Json<Vec<Peer>> {
    Json(node.peers())
}

pub async fn handle_add_peer(
    Extension(node): Extension<Arc<Node>>,
    payload: Result<Json<Peer>, JsonRejection>,
) -> StatusCode {
    let peer = match payload {
        Ok(Json(peer)) => peer,
        Err(e) => {
            tracing::warn!("Rejected add peer request: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };

    if peer.id.0.is_empty() || peer.address.is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    if node.add_peer(peer.id, peer.address) {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    }
}

pub async fn handle_remove_peer(
    Extension(node): Extension<Arc<Node>>,
    Path(id): Path<String>,
) -> StatusCode {
    match node.remove_peer(&NodeId(id)) {
        Some(_) => StatusCode::OK,
        None => StatusCode::NOT_FOUND,
    }
}
