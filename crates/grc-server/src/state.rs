use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use grc_client::{ApiClient, HttpCallDataService, TransactionVerifier};
use grc_oplog::OperationLog;
use grc_pipeline::fakes::ZERO_ADDRESS;
use grc_pipeline::{
    PipelineServices, PublishingPipeline, PublishingState, ServiceError, ServiceResult,
    TransactionSigner,
};
use grc_types::{AppConfig, CallData, Network};
use tokio::sync::Mutex;

use crate::error::{ServerError, ServerResult};

/// The one editing session the server hosts.
pub struct Session {
    pub log: OperationLog,
    pub pipeline: PublishingPipeline,
}

impl Session {
    pub fn new(config: &AppConfig, services: PipelineServices) -> Self {
        Self {
            log: OperationLog::new(),
            pipeline: PublishingPipeline::new(
                PublishingState::new(config.default_space_id.clone()),
                services,
            ),
        }
    }
}

/// Shared handler state. Proxy handlers only touch the immutable parts;
/// session handlers serialize on the session mutex.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
    pub verifier: TransactionVerifier,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    /// State backed by the real HTTP services. Without a usable wallet the
    /// session can still publish and fetch call data; sending reports why
    /// it cannot.
    pub fn from_config(config: AppConfig) -> ServerResult<Self> {
        let services = match grc_client::services_from_config(&config) {
            Ok(services) => services,
            Err(grc_client::ClientError::Config(reason)) => {
                tracing::warn!(%reason, "no wallet signer; sending transactions is disabled");
                let api = ApiClient::from_config(&config)?;
                let author = config
                    .wallet
                    .author
                    .clone()
                    .unwrap_or_else(|| ZERO_ADDRESS.to_string());
                PipelineServices::new(
                    Arc::new(grc_client::HttpPublisher::new(api.clone())),
                    Arc::new(HttpCallDataService::new(api)),
                    Arc::new(UnavailableSigner { author, reason }),
                )
            }
            Err(e) => return Err(e.into()),
        };
        Self::with_services(config, services)
    }

    pub fn with_services(config: AppConfig, services: PipelineServices) -> ServerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(|e| ServerError::Config(format!("cannot build HTTP client: {e}")))?;
        let verifier = grc_client::verifier_from_config(&config, http.clone());
        let session = Session::new(&config, services);
        Ok(Self {
            config: Arc::new(config),
            http,
            verifier,
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Call-data client for `network`, sharing the connection pool.
    pub fn call_data_service(&self, network: Network) -> HttpCallDataService {
        HttpCallDataService::new(ApiClient::with_client(
            self.http.clone(),
            self.config.api.base_url(network),
            network,
        ))
    }
}

/// Signer used when no wallet is configured.
struct UnavailableSigner {
    author: String,
    reason: String,
}

#[async_trait]
impl TransactionSigner for UnavailableSigner {
    fn address(&self) -> &str {
        &self.author
    }

    async fn send_transaction(&self, _call_data: &CallData) -> ServiceResult<String> {
        Err(ServiceError::Signer(format!("no wallet available: {}", self.reason)))
    }
}
