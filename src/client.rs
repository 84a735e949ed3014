//! HTTP client for the node API.
//!
//! Used by `kvctl` and by peer replication, which speaks to other nodes over
//! the same routes clients use.

use crate::membership::types::{NodeId, Peer};
use crate::storage::protocol::{
    KeyValue, StatsResponse, ENDPOINT_DELETE, ENDPOINT_GET, ENDPOINT_PEERS, ENDPOINT_SET,
    ENDPOINT_STATS, HEADER_REPLICATED_FROM,
};

use anyhow::Result;
use reqwest::StatusCode;
use std::time::Duration;

/// Prefixes `http://` when the address carries no scheme and drops any
/// trailing slash.
pub fn normalize_base_url(address: &str) -> String {
    let address = address.trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

#[derive(Debug, Clone)]
pub struct KvClient {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Option<Duration>,
    origin: Option<NodeId>,
}

impl KvClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            http_client,
            timeout: None,
            origin: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Marks every write from this client as replication from `origin`.
    pub fn replicated_from(mut self, origin: NodeId) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(origin) = &self.origin {
            builder = builder.header(HEADER_REPLICATED_FROM, origin.0.as_str());
        }
        builder
    }

    /// `Ok(None)` when the key does not exist.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .request(reqwest::Method::GET, ENDPOINT_GET)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("error making GET request: {}", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow::anyhow!("received non-200 response: {}", response.status()));
        }

        let kv: KeyValue = response.json().await?;
        Ok(Some(kv.value))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let payload = KeyValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let response = self
            .request(reqwest::Method::POST, ENDPOINT_SET)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("error making POST request: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("received non-200 response: {}", response.status()));
        }
        Ok(())
    }

    /// `Ok(false)` when the key did not exist on the target.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let response = self
            .request(reqwest::Method::DELETE, ENDPOINT_DELETE)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("error making DELETE request: {}", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(anyhow::anyhow!("received non-200 response: {}", response.status()));
        }
        Ok(true)
    }

    pub async fn peers(&self) -> Result<Vec<Peer>> {
        let response = self
            .request(reqwest::Method::GET, ENDPOINT_PEERS)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn add_peer(&self, id: &str, address: &str) -> Result<()> {
        self.request(reqwest::Method::POST, ENDPOINT_PEERS)
            .json(&Peer::new(id, address))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// `Ok(false)` when the peer was not registered.
    pub async fn remove_peer(&self, id: &str) -> Result<bool> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("{}/{}", ENDPOINT_PEERS, id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response.error_for_status()?;
        Ok(true)
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        let response = self
            .request(reqwest::Method::GET, ENDPOINT_STATS)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
