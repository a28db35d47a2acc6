//! Shared plumbing for the remote edit API.

use std::time::Duration;

use grc_types::{AppConfig, Network};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Client for one network's edit API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    network: Network,
}

impl ApiClient {
    pub fn new(base_url: &str, network: Network, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, network))
    }

    /// Reuse an existing connection pool.
    pub fn with_client(client: Client, base_url: &str, network: Network) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            network,
        }
    }

    pub fn from_config(config: &AppConfig) -> ClientResult<Self> {
        Self::new(
            config.api_base_url(),
            config.network,
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    /// POST a JSON body and return the parsed JSON reply. Non-2xx replies
    /// become [`ClientError::Api`] carrying the raw body; a 2xx body that is
    /// not JSON becomes [`ClientError::InvalidResponse`].
    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        handle_response(response).await
    }
}

pub(crate) async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), body = %text, "upstream returned an error");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: text,
        });
    }
    serde_json::from_str(&text)
        .map_err(|e| ClientError::InvalidResponse(format!("{e}: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let api = ApiClient::new("http://localhost:8080/", Network::Testnet, Duration::from_secs(5))
            .unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(api.network(), Network::Testnet);
    }

    #[test]
    fn from_config_follows_network() {
        let mut config = AppConfig::default();
        config.network = Network::Mainnet;
        let api = ApiClient::from_config(&config).unwrap();
        assert_eq!(api.base_url(), grc_types::config::DEFAULT_MAINNET_API);
        assert_eq!(api.network(), Network::Mainnet);
    }
}
