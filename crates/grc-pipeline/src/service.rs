use async_trait::async_trait;
use grc_types::{CallData, Operation};
use serde::Serialize;

use crate::error::ServiceResult;

/// An operation snapshot ready to be published as one edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditBatch {
    pub name: String,
    pub author: String,
    pub operations: Vec<Operation>,
}

/// Content-addressed store the edit batch is uploaded to.
#[async_trait]
pub trait PublishService: Send + Sync {
    /// Upload `edit` and return its content id.
    async fn publish_edit(&self, edit: &EditBatch) -> ServiceResult<String>;
}

/// Remote API that turns a content id into transaction call data.
#[async_trait]
pub trait CallDataService: Send + Sync {
    async fn call_data(&self, space_id: &str, content_id: &str) -> ServiceResult<CallData>;
}

/// Wallet that signs and submits transactions.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Address of the connected account. Recorded as the edit author.
    fn address(&self) -> &str;

    /// Submit `call_data` and return the transaction hash.
    async fn send_transaction(&self, call_data: &CallData) -> ServiceResult<String>;
}
