//! Wire protocol for the GRC-20 edit publisher.
//!
//! Request and response bodies shared by the HTTP server and the HTTP
//! clients, the endpoint paths of both the local proxy and the remote API,
//! and the best-effort extraction of call data and content ids from remote
//! responses whose shape varies between API versions.

pub mod endpoint;
pub mod error;
pub mod message;
pub mod normalize;

pub use endpoint::{endpoints, remote, HealthResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    CallDataApiRequest, CallDataProxyRequest, ErrorBody, Indexed, PublishEditRequest, TxStatus,
    VerifyQuery, VerifyResponse, PROTOCOL_VERSION,
};
pub use normalize::{extract_content_id, is_tx_hash, normalize_call_data};
