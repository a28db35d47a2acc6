//! HTTP clients for the GRC-20 edit publisher.
//!
//! Implements the pipeline's service traits against real endpoints:
//!
//! - [`HttpPublisher`] uploads edits to the content-addressed store
//! - [`HttpCallDataService`] asks the edit API for transaction call data
//! - [`JsonRpcSigner`] submits transactions through a wallet JSON-RPC endpoint
//! - [`TransactionVerifier`] looks up receipts and probes the indexer
//!
//! [`proxy::forward`] backs the server's generic proxy.

pub mod api;
pub mod calldata;
pub mod error;
pub mod proxy;
pub mod publisher;
pub mod rpc;
pub mod signer;
pub mod verifier;

use std::sync::Arc;
use std::time::Duration;

use grc_pipeline::PipelineServices;
use grc_types::AppConfig;

pub use api::ApiClient;
pub use calldata::HttpCallDataService;
pub use error::{ClientError, ClientResult};
pub use proxy::{forward, ProxyResponse};
pub use publisher::HttpPublisher;
pub use rpc::{JsonRpcClient, TxReceipt};
pub use signer::JsonRpcSigner;
pub use verifier::TransactionVerifier;

/// Build the wallet signer described by the configuration.
///
/// Smart-account mode signs locally with a private key, which this process
/// does not do; it must go through an external signer instead.
pub fn signer_from_config(config: &AppConfig, client: reqwest::Client) -> ClientResult<JsonRpcSigner> {
    if config.wallet.use_smart_account {
        return Err(ClientError::Config(
            "smart-account signing is not supported; point wallet.rpc_url at an external signer"
                .into(),
        ));
    }
    let rpc_url = config
        .wallet
        .rpc_url
        .as_deref()
        .ok_or_else(|| ClientError::Config("wallet.rpc_url (GRC_WALLET__RPC_URL) is not set".into()))?;
    let author = config
        .wallet
        .author
        .as_deref()
        .ok_or_else(|| ClientError::Config("wallet.author (GRC_WALLET__AUTHOR) is not set".into()))?;
    Ok(JsonRpcSigner::new(JsonRpcClient::new(client, rpc_url), author).with_polling(
        config.verifier.poll_attempts,
        Duration::from_millis(config.verifier.poll_interval_ms),
    ))
}

/// Publish, call-data and signer services for the configured network.
pub fn services_from_config(config: &AppConfig) -> ClientResult<PipelineServices> {
    let api = ApiClient::from_config(config)?;
    let signer = signer_from_config(config, api.http().clone())?;
    Ok(PipelineServices::new(
        Arc::new(HttpPublisher::new(api.clone())),
        Arc::new(HttpCallDataService::new(api)),
        Arc::new(signer),
    ))
}

/// Verifier using the wallet RPC (if any) for receipts and the configured
/// indexer (if any).
pub fn verifier_from_config(config: &AppConfig, client: reqwest::Client) -> TransactionVerifier {
    let rpc = config
        .wallet
        .rpc_url
        .as_deref()
        .map(|url| JsonRpcClient::new(client.clone(), url));
    TransactionVerifier::new(client, rpc, config.verifier.indexer_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.wallet.rpc_url = Some("http://127.0.0.1:8545".into());
        config.wallet.author = Some("0xabc".into());
        config
    }

    #[test]
    fn services_need_a_wallet() {
        let err = services_from_config(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, ClientError::Config(ref m) if m.contains("rpc_url")));

        let mut config = wallet_config();
        config.wallet.author = None;
        assert!(matches!(
            services_from_config(&config),
            Err(ClientError::Config(ref m)) if m.contains("author")
        ));
    }

    #[test]
    fn smart_account_mode_is_refused() {
        let mut config = wallet_config();
        config.wallet.use_smart_account = true;
        config.wallet.private_key = Some("0xkey".into());
        let err = signer_from_config(&config, reqwest::Client::new()).unwrap_err();
        assert!(err.to_string().contains("smart-account"));
    }

    #[test]
    fn services_use_configured_author() {
        let services = services_from_config(&wallet_config()).unwrap();
        assert_eq!(services.signer.address(), "0xabc");
    }
}
