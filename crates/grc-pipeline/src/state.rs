use std::fmt;

use grc_types::CallData;
use serde::{Deserialize, Serialize};

/// Progress through the publishing workflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PipelineStep {
    /// Waiting for a publish trigger.
    #[default]
    Ready = 1,
    /// Uploading the edit batch to the content store.
    Publishing = 2,
    /// Content id obtained; call data not yet fetched.
    AwaitingCallData = 3,
    /// Call data ready. Sent once a transaction hash is recorded.
    Sendable = 4,
}

impl PipelineStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Publishing => "publishing",
            Self::AwaitingCallData => "awaiting-call-data",
            Self::Sendable => "sendable",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.name())
    }
}

impl From<PipelineStep> for u8 {
    fn from(step: PipelineStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for PipelineStep {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Ready),
            2 => Ok(Self::Publishing),
            3 => Ok(Self::AwaitingCallData),
            4 => Ok(Self::Sendable),
            other => Err(format!("pipeline step must be 1-4, got {other}")),
        }
    }
}

/// State of one publishing attempt. In-memory only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishingState {
    pub space_id: String,
    pub operation_name: String,
    pub content_id: Option<String>,
    pub call_data: Option<CallData>,
    pub transaction_hash: Option<String>,
    pub current_step: PipelineStep,
    /// Human-readable outcome of the last action.
    pub status: String,
}

impl PublishingState {
    pub fn new(space_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            ..Self::default()
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = name.into();
        self
    }

    /// Terminal: a transaction hash has been recorded.
    pub fn is_sent(&self) -> bool {
        self.transaction_hash.is_some()
    }

    /// Clear results and progress, keeping the space id and operation name.
    pub fn reset(&mut self) {
        self.content_id = None;
        self.call_data = None;
        self.transaction_hash = None;
        self.current_step = PipelineStep::Ready;
        self.status.clear();
    }
}
