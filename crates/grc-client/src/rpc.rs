//! Minimal Ethereum JSON-RPC client: just the calls the publisher needs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::handle_response;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Deserialize)]
struct RpcReply {
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

/// Subset of a transaction receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` on success, `0x0` on revert.
    #[serde(default)]
    pub status: Option<String>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        matches!(self.status.as_deref(), Some("0x1") | Some("0x01"))
    }
}

#[derive(Clone, Debug)]
pub struct JsonRpcClient {
    client: Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ClientResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(%method, id, "json-rpc call");
        let response = self.client.post(&self.url).json(&request).send().await?;
        let body = handle_response(response).await?;
        let reply: RpcReply = serde_json::from_value(body)
            .map_err(|e| ClientError::InvalidResponse(format!("not a JSON-RPC reply: {e}")))?;
        if let Some(err) = reply.error {
            return Err(ClientError::JsonRpc {
                code: err.code,
                message: err.message,
            });
        }
        serde_json::from_value(reply.result.unwrap_or(Value::Null))
            .map_err(|e| ClientError::InvalidResponse(format!("{method}: {e}")))
    }

    /// `None` while the transaction is not mined.
    pub async fn transaction_receipt(&self, tx_hash: &str) -> ClientResult<Option<TxReceipt>> {
        self.call("eth_getTransactionReceipt", json!([tx_hash])).await
    }
}
