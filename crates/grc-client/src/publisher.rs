use async_trait::async_trait;
use grc_pipeline::{EditBatch, PublishService, ServiceResult};
use grc_protocol::{extract_content_id, remote, ProtocolError, PublishEditRequest};

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Uploads edit batches to the content-addressed store through the edit API.
#[derive(Clone, Debug)]
pub struct HttpPublisher {
    api: ApiClient,
}

impl HttpPublisher {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload and return the content id from the reply (`cid`, `contentId`,
    /// `hash` or `ipfsHash`).
    pub async fn upload(&self, edit: &EditBatch) -> ClientResult<String> {
        let request = PublishEditRequest {
            name: edit.name.clone(),
            author: edit.author.clone(),
            network: self.api.network(),
            ops: edit.operations.clone(),
        };
        let body = self.api.post_json(remote::UPLOAD_EDIT, &request).await?;
        let cid = extract_content_id(&body).ok_or_else(|| ProtocolError::MissingContentId {
            body: body.to_string(),
        })?;
        tracing::info!(%cid, operations = edit.operations.len(), "edit uploaded");
        Ok(cid)
    }
}

#[async_trait]
impl PublishService for HttpPublisher {
    async fn publish_edit(&self, edit: &EditBatch) -> ServiceResult<String> {
        Ok(self.upload(edit).await?)
    }
}
