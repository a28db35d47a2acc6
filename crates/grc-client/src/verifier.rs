use grc_protocol::{is_tx_hash, Indexed, ProtocolError, TxStatus, VerifyResponse};
use reqwest::{Client, StatusCode};

use crate::error::ClientResult;
use crate::rpc::JsonRpcClient;

/// Reports what is actually known about a submitted transaction.
///
/// Without an RPC endpoint the status is `unknown`; without an indexer URL
/// `indexed` is `unknown`. Success is only ever reported from a receipt.
#[derive(Clone, Debug)]
pub struct TransactionVerifier {
    client: Client,
    rpc: Option<JsonRpcClient>,
    indexer_url: Option<String>,
}

impl TransactionVerifier {
    pub fn new(client: Client, rpc: Option<JsonRpcClient>, indexer_url: Option<String>) -> Self {
        Self {
            client,
            rpc,
            indexer_url: indexer_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    pub async fn verify(
        &self,
        tx_hash: &str,
        space_id: Option<&str>,
    ) -> ClientResult<VerifyResponse> {
        if !is_tx_hash(tx_hash) {
            return Err(ProtocolError::InvalidTxHash(tx_hash.to_string()).into());
        }

        let status = self.receipt_status(tx_hash).await;
        let indexed = self.indexed(tx_hash).await;
        let message = describe(status, indexed);
        tracing::info!(%tx_hash, %status, ?indexed, "transaction verified");

        Ok(VerifyResponse {
            success: status == TxStatus::Confirmed,
            status,
            indexed,
            tx_hash: tx_hash.to_string(),
            space_id: space_id.map(str::to_string),
            message,
        })
    }

    async fn receipt_status(&self, tx_hash: &str) -> TxStatus {
        let Some(rpc) = &self.rpc else {
            return TxStatus::Unknown;
        };
        match rpc.transaction_receipt(tx_hash).await {
            Ok(Some(receipt)) if receipt.succeeded() => TxStatus::Confirmed,
            Ok(Some(_)) => TxStatus::Failed,
            Ok(None) => TxStatus::Pending,
            Err(e) => {
                tracing::warn!(%tx_hash, error = %e, "receipt lookup failed");
                TxStatus::Unknown
            }
        }
    }

    async fn indexed(&self, tx_hash: &str) -> Indexed {
        let Some(indexer) = &self.indexer_url else {
            return Indexed::Unknown;
        };
        let url = format!("{indexer}/tx/{tx_hash}");
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => Indexed::Yes,
            Ok(resp) if resp.status() == StatusCode::NOT_FOUND => Indexed::No,
            Ok(resp) => {
                tracing::warn!(%url, status = resp.status().as_u16(), "indexer probe inconclusive");
                Indexed::Unknown
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "indexer unreachable");
                Indexed::Unknown
            }
        }
    }
}

fn describe(status: TxStatus, indexed: Indexed) -> String {
    let chain = match status {
        TxStatus::Confirmed => "transaction confirmed",
        TxStatus::Failed => "transaction reverted",
        TxStatus::Pending => "transaction not yet mined",
        TxStatus::Unknown => "no receipt source configured or reachable",
    };
    let index = match indexed {
        Indexed::Yes => "edit indexed",
        Indexed::No => "edit not indexed yet",
        Indexed::Unknown => "indexing status unknown",
    };
    format!("{chain}; {index}")
}
