//! JSON-RPC client for transaction lookups.

use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use txwatch_types::{TransactionUpdate, TxHash};

use crate::error::RpcError;

/// Default timeout for a whole request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Method used to fetch a transaction record.
const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";

/// Request/response access to the transaction backend.
pub trait RpcClient: Send + Sync {
    /// Fetch the current record for `hash`.
    fn get_transaction_by_hash(
        &self,
        hash: &TxHash,
    ) -> impl Future<Output = Result<TransactionUpdate, RpcError>> + Send;
}

/// HTTP JSON-RPC 2.0 client.
///
/// Wraps `reqwest::Client` (a reusable connection pool) with the endpoint URL.
/// Cloning is cheap and clones share the request id counter.
#[derive(Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl JsonRpcClient {
    /// Create a client for `url` with default timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        Self::with_timeouts(url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client with explicit request and connect timeouts.
    pub fn with_timeouts(
        url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| RpcError::RequestFailed(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and return its `result` field.
    ///
    /// A JSON `null` result is returned as `Value::Null`; callers decide
    /// whether that means "not found".
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        debug!(method, id, "sending RPC request");

        let response = self.http.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("invalid JSON-RPC envelope: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

impl RpcClient for JsonRpcClient {
    async fn get_transaction_by_hash(&self, hash: &TxHash) -> Result<TransactionUpdate, RpcError> {
        let result = self
            .call(GET_TRANSACTION_BY_HASH, serde_json::json!([hash.as_str()]))
            .await?;

        if result.is_null() {
            return Err(RpcError::NotFound(hash.clone()));
        }

        Ok(TransactionUpdate::from_payload(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::json;
    use txwatch_types::TransactionStatus;

    /// Mock backend: answers by the first positional parameter.
    async fn handle(Json(request): Json<Value>) -> Json<Value> {
        let id = request["id"].clone();
        let hash = request["params"][0].as_str().unwrap_or_default().to_string();
        let body = match hash.as_str() {
            "0xknown" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "hash": "0xknown",
                    "status": "FINALIZED",
                    "data": { "contract_address": "0xA" },
                },
            }),
            "0xmissing" => json!({ "jsonrpc": "2.0", "id": id, "result": null }),
            "0xmalformed" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "status": "PENDING" },
            }),
            _ => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32000, "message": "backend exploded" },
            }),
        };
        Json(body)
    }

    async fn spawn_backend() -> String {
        let app = Router::new().route("/api", post(handle));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    #[tokio::test]
    async fn fetches_and_validates_transaction() {
        let client = JsonRpcClient::new(spawn_backend().await).unwrap();
        let update = client
            .get_transaction_by_hash(&TxHash::new("0xknown"))
            .await
            .unwrap();
        assert_eq!(update.hash, TxHash::new("0xknown"));
        assert_eq!(update.status, TransactionStatus::Finalized);
        assert_eq!(update.contract_address(), Some("0xA"));
    }

    #[tokio::test]
    async fn null_result_is_not_found() {
        let client = JsonRpcClient::new(spawn_backend().await).unwrap();
        let err = client
            .get_transaction_by_hash(&TxHash::new("0xmissing"))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::NotFound(h) if h.as_str() == "0xmissing"));
    }

    #[tokio::test]
    async fn error_object_is_surfaced() {
        let client = JsonRpcClient::new(spawn_backend().await).unwrap();
        let err = client
            .get_transaction_by_hash(&TxHash::new("0xboom"))
            .await
            .unwrap_err();
        match err {
            RpcError::Rpc { code, message } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "backend exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_record_is_invalid_response() {
        let client = JsonRpcClient::new(spawn_backend().await).unwrap();
        let err = client
            .get_transaction_by_hash(&TxHash::new("0xmalformed"))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = JsonRpcClient::with_timeouts(
            "http://127.0.0.1:9/api",
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client
            .get_transaction_by_hash(&TxHash::new("0x1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RpcError::Unreachable(_) | RpcError::RequestFailed(_)
        ));
    }
}
