//! Transport layer for the node's REST API

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::types::ResponseMetadata;
use crate::SdkError;

/// Content type of a BCS-encoded signed transaction
pub const BCS_SIGNED_TRANSACTION: &str = "application/x.aptos.signed_transaction+bcs";

/// Status, body and ledger metadata of one HTTP exchange
///
/// Non-JSON bodies arrive as [`Value::String`], empty bodies as
/// [`Value::Null`]. Statuses of 400 and above are turned into errors by the
/// client, not by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status
    pub status: u16,
    /// Body
    pub body: Value,
    /// Ledger metadata from the response headers
    pub metadata: ResponseMetadata,
}

/// Transport trait for REST communication (object-safe)
///
/// Paths are relative to the node's base URL and include any query string.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET path`
    async fn get(&self, path: &str) -> Result<RawResponse, SdkError>;

    /// `POST path` with a JSON body
    async fn post_json(&self, path: &str, body: Value) -> Result<RawResponse, SdkError>;

    /// `POST path` with a BCS signed transaction body
    async fn post_bcs(&self, path: &str, body: Bytes) -> Result<RawResponse, SdkError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, path: &str) -> Result<RawResponse, SdkError> {
        (**self).get(path).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<RawResponse, SdkError> {
        (**self).post_json(path, body).await
    }

    async fn post_bcs(&self, path: &str, body: Bytes) -> Result<RawResponse, SdkError> {
        (**self).post_bcs(path, body).await
    }
}

// ==================== Mock ====================

/// HTTP method of a mocked or recorded request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Body of a recorded request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// GET
    Empty,
    /// JSON POST
    Json(Value),
    /// BCS POST
    Bcs(Vec<u8>),
}

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Method
    pub method: Method,
    /// Path including query
    pub path: String,
    /// Body
    pub body: RequestBody,
}

/// Mock transport for testing
///
/// Responses are keyed by method and exact path (query included). A small
/// set of defaults answers the calls `build_transaction` makes, so tests only
/// have to mock what they care about.
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), (u16, Value)>>,
    default_responses: HashMap<(Method, String), (u16, Value)>,
    metadata: Mutex<ResponseMetadata>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Chain id reported by the default ledger info
    pub const DEFAULT_CHAIN_ID: u8 = 4;

    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert(
            (Method::Get, "/".to_string()),
            (
                200,
                json!({
                    "chain_id": Self::DEFAULT_CHAIN_ID,
                    "epoch": "1",
                    "ledger_version": "100",
                    "oldest_ledger_version": "0",
                    "ledger_timestamp": "1700000000000000",
                    "node_role": "full_node",
                    "oldest_block_height": "0",
                    "block_height": "50",
                    "git_hash": null
                }),
            ),
        );
        defaults.insert(
            (Method::Get, "/estimate_gas_price".to_string()),
            (
                200,
                json!({
                    "deprioritized_gas_estimate": 100,
                    "gas_estimate": 100,
                    "prioritized_gas_estimate": 150
                }),
            ),
        );
        defaults.insert(
            (Method::Get, "/-/healthy".to_string()),
            (200, json!({"message": "aptos-node:ok"})),
        );

        Self {
            responses: Mutex::new(HashMap::new()),
            default_responses: defaults,
            metadata: Mutex::new(ResponseMetadata {
                chain_id: Self::DEFAULT_CHAIN_ID,
                ..ResponseMetadata::default()
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Set the response for `method path`
    pub fn set_response(&self, method: Method, path: &str, status: u16, body: Value) {
        self.responses
            .lock()
            .insert((method, path.to_string()), (status, body));
    }

    /// Answer `GET path` with `200 body`
    pub fn on_get(&self, path: &str, body: Value) {
        self.set_response(Method::Get, path, 200, body);
    }

    /// Answer `POST path` with `200 body`
    pub fn on_post(&self, path: &str, body: Value) {
        self.set_response(Method::Post, path, 200, body);
    }

    /// Metadata attached to every response
    pub fn set_metadata(&self, metadata: ResponseMetadata) {
        *self.metadata.lock() = metadata;
    }

    /// Clear custom responses and recorded requests
    pub fn clear(&self) {
        self.responses.lock().clear();
        self.requests.lock().clear();
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests made to `method path`
    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn respond(&self, method: Method, path: &str, body: RequestBody) -> Result<RawResponse, SdkError> {
        self.requests.lock().push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });

        let key = (method, path.to_string());
        let found = self
            .responses
            .lock()
            .get(&key)
            .cloned()
            .or_else(|| self.default_responses.get(&key).cloned());

        match found {
            Some((status, body)) => Ok(RawResponse {
                status,
                body,
                metadata: self.metadata.lock().clone(),
            }),
            None => Err(SdkError::Transport(format!(
                "no mock response for {} {}",
                method, path
            ))),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<RawResponse, SdkError> {
        self.respond(Method::Get, path, RequestBody::Empty)
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<RawResponse, SdkError> {
        self.respond(Method::Post, path, RequestBody::Json(body))
    }

    async fn post_bcs(&self, path: &str, body: Bytes) -> Result<RawResponse, SdkError> {
        self.respond(Method::Post, path, RequestBody::Bcs(body.to_vec()))
    }
}

// ==================== HTTP ====================

/// HTTP transport backed by reqwest
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a transport from a client config
    pub fn new(config: &crate::ClientConfig) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.node_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<RawResponse, SdkError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers();
        let metadata =
            ResponseMetadata::from_headers(|name| headers.get(name).and_then(|v| v.to_str().ok()));

        let text = response
            .text()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(RawResponse {
            status,
            body,
            metadata,
        })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<RawResponse, SdkError> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<RawResponse, SdkError> {
        self.send(self.client.post(self.url(path)).json(&body)).await
    }

    async fn post_bcs(&self, path: &str, body: Bytes) -> Result<RawResponse, SdkError> {
        let request = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, BCS_SIGNED_TRANSACTION)
            .body(body);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults_and_overrides() {
        let mock = MockTransport::new();
        let info = mock.get("/").await.unwrap();
        assert_eq!(info.body["chain_id"], 4);

        mock.on_get("/", json!({"chain_id": 2}));
        let info = mock.get("/").await.unwrap();
        assert_eq!(info.body["chain_id"], 2);
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockTransport::new();
        mock.on_post("/transactions", json!({"hash": "0x1"}));
        mock.post_bcs("/transactions", Bytes::from_static(&[1, 2, 3]))
            .await
            .unwrap();
        assert!(mock.get("/missing").await.is_err());

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, RequestBody::Bcs(vec![1, 2, 3]));
        assert_eq!(mock.request_count(Method::Get, "/missing"), 1);
    }

    #[tokio::test]
    async fn test_mock_error_status_passes_through() {
        let mock = MockTransport::new();
        mock.set_response(Method::Get, "/accounts/0x1", 404, json!({"message": "gone"}));
        let response = mock.get("/accounts/0x1").await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_base_url_trimmed() {
        let transport =
            HttpTransport::new(&crate::ClientConfig::new("http://localhost:8080/v1/")).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080/v1");
        assert_eq!(transport.url("/"), "http://localhost:8080/v1/");
    }
}
