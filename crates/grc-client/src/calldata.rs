use async_trait::async_trait;
use grc_pipeline::{CallDataService, ServiceResult};
use grc_protocol::{normalize_call_data, remote, CallDataApiRequest, ProtocolError};
use grc_types::{CallData, Network};

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Requests transaction call data for a published content id.
#[derive(Clone, Debug)]
pub struct HttpCallDataService {
    api: ApiClient,
}

impl HttpCallDataService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch and normalize call data. A space id that is not a plain path
    /// segment fails with [`ProtocolError::InvalidSpaceId`] before any
    /// request is made; a reply with no usable `to`/`data` pair fails with
    /// [`ProtocolError::MalformedCallData`] carrying the raw body.
    pub async fn fetch(
        &self,
        space_id: &str,
        content_id: &str,
        network: Network,
    ) -> ClientResult<CallData> {
        let path = remote::calldata(space_id)?;
        let request = CallDataApiRequest {
            cid: content_id.to_string(),
            network,
        };
        let body = self
            .api
            .post_json(&path, &request)
            .await?;
        tracing::debug!(%space_id, response = %body, "call data response");
        let call_data = normalize_call_data(&body).ok_or_else(|| {
            ProtocolError::MalformedCallData {
                body: body.to_string(),
            }
        })?;
        Ok(call_data)
    }
}

#[async_trait]
impl CallDataService for HttpCallDataService {
    async fn call_data(&self, space_id: &str, content_id: &str) -> ServiceResult<CallData> {
        Ok(self.fetch(space_id, content_id, self.api.network()).await?)
    }
}
