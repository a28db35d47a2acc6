use grc_pipeline::ServiceError;
use grc_protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

impl ClientError {
    /// Upstream status and raw body, when the error came from a non-2xx reply
    /// or an unusable body.
    pub fn upstream(&self) -> Option<(Option<u16>, String)> {
        match self {
            Self::Api { status, message } => Some((Some(*status), message.clone())),
            Self::Protocol(ProtocolError::MalformedCallData { body })
            | Self::Protocol(ProtocolError::MissingContentId { body }) => Some((None, body.clone())),
            _ => None,
        }
    }

    /// Convert into the pipeline's service error, for calls made on behalf
    /// of a wallet.
    pub fn into_signer_error(self) -> ServiceError {
        match self {
            Self::JsonRpc { code, message } if code == USER_REJECTED_CODE => {
                ServiceError::SignerRejected(message)
            }
            Self::JsonRpc { message, .. } => ServiceError::from_signer_message(message),
            other => other.into(),
        }
    }
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => {
                ServiceError::http("request failed", status, message)
            }
            ClientError::Protocol(e @ ProtocolError::InvalidSpaceId(_)) => {
                ServiceError::transport(e.to_string())
            }
            ClientError::Protocol(e) => ServiceError::MalformedResponse(e.to_string()),
            ClientError::InvalidResponse(m) => ServiceError::MalformedResponse(m),
            ClientError::JsonRpc { message, .. } => ServiceError::from_signer_message(message),
            other => ServiceError::transport(other.to_string()),
        }
    }
}
