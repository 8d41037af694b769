//! HTTP client for the catalog service
//!
//! Implements `RemoteFetcher` on top of reqwest. Attaches the bearer token
//! when one is held, drops it on `401`, and unwraps the service's
//! `{code, msg, data}` response envelope.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::source::RemoteFetcher;
use crate::Result;

/// reqwest-backed catalog service client
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl HttpFetcher {
    /// Create a client from configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("app-catalog/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;

        debug!("Creating catalog client for {}", config.base_url);

        Ok(HttpFetcher {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_store: Arc::new(RwLock::new(config.token.clone())),
        })
    }

    /// Full URL for a service path.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Replace the bearer token.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    /// Current bearer token.
    pub async fn token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token_store.read().await.as_ref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let request = self.build_request(self.client.get(&url)).await;
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response.bytes().await?;
                let body: Value = serde_json::from_slice(&bytes)
                    .map_err(|e| CatalogError::Decode(e.to_string()))?;
                match unwrap_envelope(body) {
                    Err(CatalogError::Unauthorized) => self.reject_token().await,
                    other => other,
                }
            }
            StatusCode::UNAUTHORIZED => self.reject_token().await,
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(CatalogError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

impl HttpFetcher {
    async fn reject_token(&self) -> Result<Value> {
        warn!("Catalog service rejected token, clearing it");
        self.set_token(None).await;
        Err(CatalogError::Unauthorized)
    }
}

/// Strip the `{code, msg, data}` envelope if the body carries one.
///
/// An envelope whose `code` is present and not `0` or `200` is a service
/// failure even under an HTTP `200`. Code `401` maps to `Unauthorized`, any
/// other code to `Status` carrying `msg`.
pub fn unwrap_envelope(body: Value) -> Result<Value> {
    match body {
        Value::Object(mut map)
            if map.contains_key("data") && (map.contains_key("code") || map.contains_key("msg")) =>
        {
            match envelope_code(map.get("code")) {
                None | Some(0) | Some(200) => Ok(map.remove("data").unwrap_or(Value::Null)),
                Some(401) => Err(CatalogError::Unauthorized),
                Some(code) => {
                    let body = match map.remove("msg") {
                        Some(Value::String(msg)) => msg,
                        Some(Value::Null) | None => String::new(),
                        Some(other) => other.to_string(),
                    };
                    // Codes outside the HTTP range report as a server error
                    let status = u16::try_from(code).unwrap_or(500);
                    Err(CatalogError::Status { status, body })
                }
            }
        }
        other => Ok(other),
    }
}

/// Numeric envelope code. Missing or null codes count as success.
fn envelope_code(code: Option<&Value>) -> Option<i64> {
    match code? {
        Value::Null => None,
        Value::Number(n) => Some(n.as_i64().unwrap_or(-1)),
        Value::String(s) => Some(s.trim().parse().unwrap_or(-1)),
        _ => Some(-1),
    }
}
