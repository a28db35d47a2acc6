use thiserror::Error;

use crate::state::PipelineStep;

/// Failure reported by one of the external services the pipeline drives.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached or answered with a non-success status.
    #[error("{message}{}", status_suffix(.status, .body))]
    Transport {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    /// The service answered, but not in a shape we could use.
    #[error("unexpected response: {0}")]
    MalformedResponse(String),

    /// The wallet user declined the request.
    #[error("transaction rejected in wallet: {0}")]
    SignerRejected(String),

    /// The wallet reported the account cannot cover value plus gas.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Any other wallet-side failure.
    #[error("signer error: {0}")]
    Signer(String),
}

fn status_suffix(status: &Option<u16>, body: &Option<String>) -> String {
    match (status, body) {
        (Some(s), Some(b)) if !b.is_empty() => format!(" (HTTP {s}: {b})"),
        (Some(s), _) => format!(" (HTTP {s})"),
        (None, _) => String::new(),
    }
}

impl ServiceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn http(message: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
            body: Some(body.into()),
        }
    }

    /// Classify a wallet error message. Wallets only give us free text (and
    /// sometimes the EIP-1193 code 4001), so this is pattern matching.
    pub fn from_signer_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        if lower.contains("user rejected")
            || lower.contains("user denied")
            || lower.contains("rejected the request")
            || lower.contains("4001")
        {
            Self::SignerRejected(message)
        } else if lower.contains("insufficient funds") {
            Self::InsufficientFunds(message)
        } else {
            Self::Signer(message)
        }
    }

    pub fn is_signer_error(&self) -> bool {
        matches!(
            self,
            Self::SignerRejected(_) | Self::InsufficientFunds(_) | Self::Signer(_)
        )
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors produced by pipeline steps. Every variant is recoverable: the
/// pipeline records its message as the status and stays on (or rolls back
/// to) the last successful step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("operation name is required")]
    MissingOperationName,

    #[error("no operations to publish")]
    EmptyLog,

    #[error("space id is required")]
    MissingSpaceId,

    #[error("cannot {action} at step {step}")]
    InvalidStep {
        action: &'static str,
        step: PipelineStep,
    },

    #[error("transaction already sent: {0}")]
    AlreadySent(String),

    #[error("publishing edit failed: {0}")]
    Publish(#[source] ServiceError),

    #[error("fetching call data failed: {0}")]
    CallData(#[source] ServiceError),

    #[error("sending transaction failed: {0}")]
    Send(#[source] ServiceError),
}

impl PipelineError {
    /// Validation failures are detected before any service is called.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingOperationName
                | Self::EmptyLog
                | Self::MissingSpaceId
                | Self::InvalidStep { .. }
                | Self::AlreadySent(_)
        )
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
