use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use super::protocol::{
    ErrorResponse, KeyQuery, KeyValue, StatsResponse, WriteResponse, HEADER_REPLICATED_FROM,
};
use super::types::StoreError;
use crate::membership::types::NodeId;
use crate::node::service::Node;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn store_error(err: StoreError) -> ApiError {
    let status = match &err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidKey => StatusCode::BAD_REQUEST,
        StoreError::Config(_) | StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err.to_string())
}

fn required_key(query: KeyQuery) -> Result<String, ApiError> {
    match query.key {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(api_error(StatusCode::BAD_REQUEST, "Key is missing")),
    }
}

fn replicated_from(headers: &HeaderMap) -> Option<NodeId> {
    headers
        .get(HEADER_REPLICATED_FROM)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(NodeId::from)
}

fn write_key(
    node: &Node,
    headers: &HeaderMap,
    key: &str,
    value: String,
) -> Result<(), StoreError> {
    match replicated_from(headers) {
        Some(origin) => node.apply_replica_set(&origin, key, value),
        None => node.set(key, value),
    }
}

fn delete_key(node: &Node, headers: &HeaderMap, key: &str) -> Result<(), ApiError> {
    let existed = match replicated_from(headers) {
        Some(origin) => node.apply_replica_delete(&origin, key),
        None => node.delete(key),
    }
    .map_err(store_error)?;

    if existed {
        Ok(())
    } else {
        Err(api_error(StatusCode::NOT_FOUND, "Key not found"))
    }
}

pub async fn handle_get(
    Extension(node): Extension<Arc<Node>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<KeyValue>, ApiError> {
    let key = required_key(query)?;
    let value = node.get(&key).map_err(store_error)?;
    Ok(Json(KeyValue { key, value }))
}

pub async fn handle_set(
    Extension(node): Extension<Arc<Node>>,
    headers: HeaderMap,
    payload: Result<Json<KeyValue>, JsonRejection>,
) -> Result<Json<WriteResponse>, ApiError> {
    let Json(kv) = payload.map_err(|e| {
        tracing::warn!("Rejected set request: {}", e);
        api_error(StatusCode::BAD_REQUEST, e.body_text())
    })?;

    write_key(&node, &headers, &kv.key, kv.value).map_err(store_error)?;
    Ok(Json(WriteResponse { success: true }))
}

pub async fn handle_delete(
    Extension(node): Extension<Arc<Node>>,
    headers: HeaderMap,
    Query(query): Query<KeyQuery>,
) -> Result<Json<WriteResponse>, ApiError> {
    let key = required_key(query)?;
    delete_key(&node, &headers, &key)?;
    Ok(Json(WriteResponse { success: true }))
}

pub async fn handle_kv_get(
    Extension(node): Extension<Arc<Node>>,
    Path(key): Path<String>,
) -> Result<String, ApiError> {
    node.get(&key).map_err(store_error)
}

/// Values are stored as text, so a body that is not UTF-8 is a 400.
pub async fn handle_kv_put(
    Extension(node): Extension<Arc<Node>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WriteResponse>, ApiError> {
    let value = String::from_utf8(body.to_vec())
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Value must be valid UTF-8"))?;

    write_key(&node, &headers, &key, value).map_err(store_error)?;
    Ok(Json(WriteResponse { success: true }))
}

pub async fn handle_kv_delete(
    Extension(node): Extension<Arc<Node>>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Json<WriteResponse>, ApiError> {
    delete_key(&node, &headers, &key)?;
    Ok(Json(WriteResponse { success: true }))
}

pub async fn handle_stats(Extension(node): Extension<Arc<Node>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        node_id: node.id.to_string(),
        address: node.address.clone(),
        peer_count: node.peer_count(),
        partitions: node.partition_counts(),
    })
}

pub async fn handle_health() -> StatusCode {
    StatusCode::OK
}
