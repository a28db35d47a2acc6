//! Application configuration.
//!
//! Values come from three layers, later layers winning: built-in defaults,
//! an optional TOML file, and `GRC_*` environment variables.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::network::Network;

pub const DEFAULT_TESTNET_API: &str = "https://hypergraph-v2-testnet.up.railway.app";
pub const DEFAULT_MAINNET_API: &str = "https://hypergraph-v2.up.railway.app";

/// Top-level configuration shared by the server and the CLI.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Network edits are published to.
    pub network: Network,
    /// Space used when a request does not name one.
    pub default_space_id: String,
    pub api: ApiConfig,
    pub wallet: WalletConfig,
    pub verifier: VerifierConfig,
    pub server: ServerSection,
}

/// Remote API base URLs, one per network.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub testnet_url: String,
    pub mainnet_url: String,
    /// Per-request timeout for outbound HTTP calls.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            testnet_url: DEFAULT_TESTNET_API.into(),
            mainnet_url: DEFAULT_MAINNET_API.into(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Base URL for `network`, without a trailing slash.
    pub fn base_url(&self, network: Network) -> &str {
        let url = match network {
            Network::Testnet => &self.testnet_url,
            Network::Mainnet => &self.mainnet_url,
        };
        url.trim_end_matches('/')
    }
}

/// Signer settings.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet that signs and sends transactions.
    pub rpc_url: Option<String>,
    /// Address recorded as the author of published edits and used as `from`.
    pub author: Option<String>,
    pub use_smart_account: bool,
    /// Key for a smart-account signer. Never logged.
    pub private_key: Option<String>,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("rpc_url", &self.rpc_url)
            .field("author", &self.author)
            .field("use_smart_account", &self.use_smart_account)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Transaction verification settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Indexer endpoint probed for `{indexer_url}/tx/{hash}`. When unset the
    /// indexing status is reported as unknown.
    pub indexer_url: Option<String>,
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            indexer_url: None,
            poll_attempts: 10,
            poll_interval_ms: 2_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_addr: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
        }
    }
}

/// Prefix of environment overrides. Nested keys use `__`, so
/// `GRC_WALLET__RPC_URL` sets `wallet.rpc_url`.
pub const ENV_PREFIX: &str = "GRC";

impl AppConfig {
    /// Load defaults, then the optional TOML file, then the process
    /// environment, and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`AppConfig::load`], reading overrides from `env` instead of
    /// the process environment when it is given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("api.testnet_url", &self.api.testnet_url),
            ("api.mainnet_url", &self.api.mainnet_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be an http(s) URL, got {url:?}"
                )));
            }
        }
        if self.wallet.use_smart_account
            && self.wallet.private_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "wallet.use_smart_account requires wallet.private_key".into(),
            ));
        }
        Ok(())
    }

    /// API base URL for the configured network.
    pub fn api_base_url(&self) -> &str {
        self.api.base_url(self.network)
    }
}
