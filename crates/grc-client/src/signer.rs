use std::time::Duration;

use async_trait::async_trait;
use grc_pipeline::{ServiceResult, TransactionSigner};
use grc_types::CallData;
use serde_json::json;

use crate::error::ClientResult;
use crate::rpc::{JsonRpcClient, TxReceipt};

/// Signs and submits through a wallet's JSON-RPC endpoint
/// (`eth_sendTransaction`). Keys never pass through this process.
#[derive(Clone, Debug)]
pub struct JsonRpcSigner {
    rpc: JsonRpcClient,
    from: String,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl JsonRpcSigner {
    pub fn new(rpc: JsonRpcClient, from: impl Into<String>) -> Self {
        Self {
            rpc,
            from: from.into(),
            poll_attempts: 10,
            poll_interval: Duration::from_secs(2),
        }
    }

    pub fn with_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval = interval;
        self
    }

    /// Poll `eth_getTransactionReceipt` until the transaction is mined or
    /// the attempts run out. `None` means still pending.
    pub async fn wait_for_receipt(&self, tx_hash: &str) -> ClientResult<Option<TxReceipt>> {
        for attempt in 1..=self.poll_attempts.max(1) {
            if let Some(receipt) = self.rpc.transaction_receipt(tx_hash).await? {
                tracing::info!(%tx_hash, attempt, success = receipt.succeeded(), "receipt found");
                return Ok(Some(receipt));
            }
            tracing::debug!(%tx_hash, attempt, "receipt not yet available");
            if attempt < self.poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl TransactionSigner for JsonRpcSigner {
    fn address(&self) -> &str {
        &self.from
    }

    async fn send_transaction(&self, call_data: &CallData) -> ServiceResult<String> {
        let params = json!([{
            "from": self.from,
            "to": call_data.to,
            "data": call_data.data,
        }]);
        let hash: String = self
            .rpc
            .call("eth_sendTransaction", params)
            .await
            .map_err(|e| e.into_signer_error())?;
        tracing::info!(%hash, to = %call_data.to, "wallet accepted transaction");
        Ok(hash)
    }
}
