//! In-process stand-ins for the external services.
//!
//! Two families live here, kept out of the pipeline itself:
//! - scripted fakes ([`FakePublisher`], [`FakeCallData`], [`FakeSigner`])
//!   that replay canned responses and record what they were asked, for tests
//! - dry-run services ([`dry_run`]) that derive deterministic ids from the
//!   payload, for exercising the workflow without touching a network

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use grc_types::CallData;

use crate::error::{ServiceError, ServiceResult};
use crate::pipeline::PipelineServices;
use crate::service::{CallDataService, EditBatch, PublishService, TransactionSigner};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replays responses in order; the last one repeats forever.
struct Script<T: Clone> {
    responses: Mutex<VecDeque<ServiceResult<T>>>,
}

impl<T: Clone> Script<T> {
    fn new(responses: Vec<ServiceResult<T>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    fn next(&self) -> ServiceResult<T> {
        let mut responses = lock(&self.responses);
        if responses.len() > 1 {
            responses
                .pop_front()
                .unwrap_or_else(|| Err(ServiceError::transport("script exhausted")))
        } else {
            responses
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ServiceError::transport("script exhausted")))
        }
    }
}

/// Scripted [`PublishService`].
pub struct FakePublisher {
    script: Script<String>,
    received: Mutex<Vec<EditBatch>>,
}

impl FakePublisher {
    pub fn scripted(responses: Vec<ServiceResult<String>>) -> Self {
        Self {
            script: Script::new(responses),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(cid: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(cid.into())])
    }

    pub fn failing(err: ServiceError) -> Self {
        Self::scripted(vec![Err(err)])
    }

    /// Every batch this publisher was asked to upload.
    pub fn received(&self) -> Vec<EditBatch> {
        lock(&self.received).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.received).len()
    }
}

#[async_trait]
impl PublishService for FakePublisher {
    async fn publish_edit(&self, edit: &EditBatch) -> ServiceResult<String> {
        lock(&self.received).push(edit.clone());
        self.script.next()
    }
}

/// Scripted [`CallDataService`].
pub struct FakeCallData {
    script: Script<CallData>,
    received: Mutex<Vec<(String, String)>>,
}

impl FakeCallData {
    pub fn scripted(responses: Vec<ServiceResult<CallData>>) -> Self {
        Self {
            script: Script::new(responses),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(call_data: CallData) -> Self {
        Self::scripted(vec![Ok(call_data)])
    }

    pub fn failing(err: ServiceError) -> Self {
        Self::scripted(vec![Err(err)])
    }

    /// `(space_id, content_id)` pairs this service was asked for.
    pub fn received(&self) -> Vec<(String, String)> {
        lock(&self.received).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.received).len()
    }
}

#[async_trait]
impl CallDataService for FakeCallData {
    async fn call_data(&self, space_id: &str, content_id: &str) -> ServiceResult<CallData> {
        lock(&self.received).push((space_id.to_string(), content_id.to_string()));
        self.script.next()
    }
}

/// Scripted [`TransactionSigner`].
pub struct FakeSigner {
    address: String,
    script: Script<String>,
    received: Mutex<Vec<CallData>>,
}

impl FakeSigner {
    pub fn scripted(address: impl Into<String>, responses: Vec<ServiceResult<String>>) -> Self {
        Self {
            address: address.into(),
            script: Script::new(responses),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(hash: impl Into<String>) -> Self {
        Self::scripted(ZERO_ADDRESS, vec![Ok(hash.into())])
    }

    pub fn failing(err: ServiceError) -> Self {
        Self::scripted(ZERO_ADDRESS, vec![Err(err)])
    }

    pub fn received(&self) -> Vec<CallData> {
        lock(&self.received).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.received).len()
    }
}

#[async_trait]
impl TransactionSigner for FakeSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn send_transaction(&self, call_data: &CallData) -> ServiceResult<String> {
        lock(&self.received).push(call_data.clone());
        self.script.next()
    }
}

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Publisher whose content id is the BLAKE3 hash of the serialized batch.
pub struct DryRunPublisher;

#[async_trait]
impl PublishService for DryRunPublisher {
    async fn publish_edit(&self, edit: &EditBatch) -> ServiceResult<String> {
        let bytes = serde_json::to_vec(edit)
            .map_err(|e| ServiceError::MalformedResponse(format!("cannot serialize edit: {e}")))?;
        Ok(format!("dryrun://{}", blake3::hash(&bytes).to_hex()))
    }
}

/// Call data addressed to the zero address, carrying the content id bytes.
pub struct DryRunCallData;

#[async_trait]
impl CallDataService for DryRunCallData {
    async fn call_data(&self, space_id: &str, content_id: &str) -> ServiceResult<CallData> {
        let payload = format!("{space_id}:{content_id}");
        Ok(CallData::new(ZERO_ADDRESS, format!("0x{}", hex::encode(payload))))
    }
}

/// Signer whose hash is the BLAKE3 hash of the call data. Nothing is sent.
pub struct DryRunSigner {
    address: String,
}

impl DryRunSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl TransactionSigner for DryRunSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn send_transaction(&self, call_data: &CallData) -> ServiceResult<String> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(call_data.to.as_bytes());
        hasher.update(call_data.data.as_bytes());
        Ok(format!("0x{}", hasher.finalize().to_hex()))
    }
}

/// Services that never leave the process.
pub fn dry_run(author: impl Into<String>) -> PipelineServices {
    PipelineServices::new(
        Arc::new(DryRunPublisher),
        Arc::new(DryRunCallData),
        Arc::new(DryRunSigner::new(author)),
    )
}
