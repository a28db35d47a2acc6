use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("call data response has no usable to/data fields: {body}")]
    MalformedCallData { body: String },

    #[error("publish response has no content id: {body}")]
    MissingContentId { body: String },

    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("invalid space id: {0:?}")]
    InvalidSpaceId(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
