use std::sync::Arc;

use grc_types::{CallData, Operation};

use crate::error::{PipelineError, PipelineResult, ServiceError};
use crate::service::{CallDataService, EditBatch, PublishService, TransactionSigner};
use crate::state::{PipelineStep, PublishingState};

/// The external services a pipeline drives.
#[derive(Clone)]
pub struct PipelineServices {
    pub publisher: Arc<dyn PublishService>,
    pub call_data: Arc<dyn CallDataService>,
    pub signer: Arc<dyn TransactionSigner>,
}

impl PipelineServices {
    pub fn new(
        publisher: Arc<dyn PublishService>,
        call_data: Arc<dyn CallDataService>,
        signer: Arc<dyn TransactionSigner>,
    ) -> Self {
        Self {
            publisher,
            call_data,
            signer,
        }
    }
}

/// Strictly sequential publishing workflow:
///
/// ```text
/// 1 Ready --publish--> 2 Publishing --ok--> 3 AwaitingCallData --call data--> 4 Sendable --send--> Sent
///                          |err -> 1               |err -> 3                      |err -> 4
/// ```
///
/// Every step takes `&mut self`, so at most one attempt is in flight per
/// pipeline. Steps only run when called; nothing is retried automatically.
/// Each outcome, success or failure, is written to
/// [`PublishingState::status`].
pub struct PublishingPipeline {
    state: PublishingState,
    services: PipelineServices,
}

impl PublishingPipeline {
    pub fn new(state: PublishingState, services: PipelineServices) -> Self {
        Self { state, services }
    }

    pub fn state(&self) -> &PublishingState {
        &self.state
    }

    pub fn step(&self) -> PipelineStep {
        self.state.current_step
    }

    pub fn set_space_id(&mut self, space_id: impl Into<String>) {
        self.state.space_id = space_id.into();
    }

    pub fn set_operation_name(&mut self, name: impl Into<String>) {
        self.state.operation_name = name.into();
    }

    /// Step 1 -> 2 -> 3: upload the operation snapshot and record its
    /// content id. On failure the pipeline returns to step 1 with no
    /// content id.
    pub async fn publish(&mut self, operations: &[Operation]) -> PipelineResult<String> {
        // Publishing on entry means the previous attempt's future was
        // dropped mid-flight; treat it as Ready.
        if !matches!(
            self.state.current_step,
            PipelineStep::Ready | PipelineStep::Publishing
        ) {
            let step = self.state.current_step;
            return Err(self.fail(PipelineError::InvalidStep {
                action: "publish",
                step,
            }));
        }
        self.state.current_step = PipelineStep::Ready;

        if self.state.operation_name.trim().is_empty() {
            return Err(self.fail(PipelineError::MissingOperationName));
        }
        if operations.is_empty() {
            return Err(self.fail(PipelineError::EmptyLog));
        }

        let edit = EditBatch {
            name: self.state.operation_name.trim().to_string(),
            author: self.services.signer.address().to_string(),
            operations: operations.to_vec(),
        };

        self.state.current_step = PipelineStep::Publishing;
        self.state.status = format!("Publishing {} operation(s)...", operations.len());
        tracing::info!(
            name = %edit.name,
            author = %edit.author,
            operations = operations.len(),
            "publishing edit"
        );

        let result = self
            .services
            .publisher
            .publish_edit(&edit)
            .await
            .and_then(|cid| non_empty(cid, "publish service returned an empty content id"));

        match result {
            Ok(cid) => {
                self.state.content_id = Some(cid.clone());
                self.state.current_step = PipelineStep::AwaitingCallData;
                self.state.status = format!("Edit published: {cid}");
                tracing::info!(%cid, "edit published");
                Ok(cid)
            }
            Err(e) => {
                self.state.content_id = None;
                self.state.current_step = PipelineStep::Ready;
                Err(self.fail(PipelineError::Publish(e)))
            }
        }
    }

    /// Step 3 -> 4: fetch call data for the recorded content id. On failure
    /// the pipeline stays at step 3 with the content id kept.
    pub async fn request_call_data(&mut self) -> PipelineResult<CallData> {
        let step = self.state.current_step;
        let content_id = match (step, self.state.content_id.clone()) {
            (PipelineStep::AwaitingCallData, Some(cid)) => cid,
            _ => {
                return Err(self.fail(PipelineError::InvalidStep {
                    action: "request call data",
                    step,
                }))
            }
        };
        let space_id = self.state.space_id.trim().to_string();
        if space_id.is_empty() {
            return Err(self.fail(PipelineError::MissingSpaceId));
        }

        self.state.status = "Requesting call data...".into();
        tracing::info!(%space_id, %content_id, "requesting call data");

        let result = self
            .services
            .call_data
            .call_data(&space_id, &content_id)
            .await
            .and_then(|cd| {
                if cd.is_well_formed() {
                    Ok(cd)
                } else {
                    Err(ServiceError::MalformedResponse(format!(
                        "call data is not hex: to={:?} data={:?}",
                        cd.to, cd.data
                    )))
                }
            });

        match result {
            Ok(call_data) => {
                self.state.call_data = Some(call_data.clone());
                self.state.current_step = PipelineStep::Sendable;
                self.state.status = format!("Call data ready for {}", call_data.to);
                tracing::info!(to = %call_data.to, bytes = call_data.data.len(), "call data ready");
                Ok(call_data)
            }
            Err(e) => Err(self.fail(PipelineError::CallData(e))),
        }
    }

    /// Step 4 -> Sent: submit the call data through the signer. On failure
    /// the pipeline stays at step 4 and may be retried.
    pub async fn send_transaction(&mut self) -> PipelineResult<String> {
        if let Some(hash) = self.state.transaction_hash.clone() {
            return Err(self.fail(PipelineError::AlreadySent(hash)));
        }
        let step = self.state.current_step;
        let call_data = match (step, self.state.call_data.clone()) {
            (PipelineStep::Sendable, Some(cd)) => cd,
            _ => {
                return Err(self.fail(PipelineError::InvalidStep {
                    action: "send transaction",
                    step,
                }))
            }
        };

        self.state.status = "Waiting for wallet...".into();
        tracing::info!(to = %call_data.to, from = %self.services.signer.address(), "sending transaction");

        let result = self
            .services
            .signer
            .send_transaction(&call_data)
            .await
            .and_then(|hash| non_empty(hash, "signer returned an empty transaction hash"));

        match result {
            Ok(hash) => {
                self.state.transaction_hash = Some(hash.clone());
                self.state.status = format!("Transaction sent: {hash}");
                tracing::info!(%hash, "transaction sent");
                Ok(hash)
            }
            Err(e) => Err(self.fail(PipelineError::Send(e))),
        }
    }

    /// One-click publish: run the remaining steps back to back, stopping at
    /// the first failure without advancing past it. Resumes from the
    /// current step, so a failed one-click can be re-run.
    pub async fn publish_all(&mut self, operations: &[Operation]) -> PipelineResult<String> {
        if let Some(hash) = self.state.transaction_hash.clone() {
            return Err(self.fail(PipelineError::AlreadySent(hash)));
        }
        if matches!(
            self.state.current_step,
            PipelineStep::Ready | PipelineStep::Publishing
        ) {
            self.publish(operations).await?;
        }
        if self.state.current_step == PipelineStep::AwaitingCallData {
            self.request_call_data().await?;
        }
        self.send_transaction().await
    }

    /// Back to step 1, keeping the space id and operation name.
    pub fn reset(&mut self) {
        self.state.reset();
        self.state.status = "Ready".into();
        tracing::debug!("publishing state reset");
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        self.state.status = err.to_string();
        if err.is_validation() {
            tracing::debug!(step = %self.state.current_step, error = %err, "pipeline step refused");
        } else {
            tracing::warn!(step = %self.state.current_step, error = %err, "pipeline step failed");
        }
        err
    }
}

fn non_empty(value: String, message: &str) -> Result<String, ServiceError> {
    if value.trim().is_empty() {
        Err(ServiceError::MalformedResponse(message.into()))
    } else {
        Ok(value)
    }
}
